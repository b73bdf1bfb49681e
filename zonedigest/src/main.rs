use std::fs::File;
use std::io::{self, BufReader};
use std::process;
use std::time::Instant;

use zonedigest::encoder::RecordEncoderPolicy;
use zonedigest::error::DriverError;
use zonedigest::store::{FlatStore, TreeStore, ZoneStore};
use zonedigest::{lifecycle, update};
use zonedigest_proto::signing::ZoneSigningKey;
use zonedigest_proto::{zonefile, Name};

mod args;

use args::Args;

const DEFAULT_TTL: u32 = 3600;

fn main() {
    let args = Args::parse();
    match run(&args) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("zonedigest: {}", e);
            process::exit(e.exit_code());
        }
    }
}

fn run(args: &Args) -> Result<i32, DriverError> {
    let origin = Name::from_ascii(&args.origin)
        .map_err(|e| DriverError::Usage(format!("invalid origin {}: {}", args.origin, e)))?;

    let quiet = args.quiet;
    let warn = |msg: String| {
        if !quiet {
            eprintln!("warning: {}", msg);
        }
    };

    let t_load = Instant::now();
    let records = match &args.zonefile {
        Some(path) => {
            let file = File::open(path)?;
            zonefile::read(BufReader::new(file), &origin, warn)?
        }
        None => {
            let stdin = io::stdin();
            zonefile::read(stdin.lock(), &origin, warn)?
        }
    };
    let load_elapsed = t_load.elapsed();

    let policy = RecordEncoderPolicy::Typed;

    let mut store: Box<dyn ZoneStore> = match (args.tree_depth, args.tree_width) {
        (Some(depth), Some(width)) => {
            let mut tree = TreeStore::new(origin.clone(), depth, width);
            for record in records {
                tree.add(record);
            }
            Box::new(tree)
        }
        _ => Box::new(FlatStore::from_records(origin.clone(), records)),
    };

    let signing_key = args
        .signing_key
        .as_ref()
        .map(|path| ZoneSigningKey::load(path, origin.clone()))
        .transpose()?;

    let t_placeholder = Instant::now();
    if !args.placeholders.is_empty() {
        lifecycle::add_placeholders(store.as_mut(), &args.placeholders, policy, warn)?;
    }
    let placeholder_elapsed = t_placeholder.elapsed();

    let t_calc = Instant::now();
    if args.calculate {
        lifecycle::calculate(store.as_mut(), policy, signing_key.as_ref(), warn)?;
    }
    let calc_elapsed = t_calc.elapsed();

    let t_verify = Instant::now();
    let mut verify_ok = true;
    if args.verify {
        verify_ok = lifecycle::verify(store.as_mut(), policy, |msg| eprintln!("{}", msg))?;
    }
    let verify_elapsed = t_verify.elapsed();

    let t_update = Instant::now();
    if let Some(update_path) = &args.update_file {
        let file = File::open(update_path)?;
        update::apply(store.as_mut(), BufReader::new(file), DEFAULT_TTL, warn)?;
        if args.calculate {
            lifecycle::calculate(store.as_mut(), policy, signing_key.as_ref(), warn)?;
        }
    }
    let update_elapsed = t_update.elapsed();

    let t_write = Instant::now();
    if let Some(output_path) = &args.output_file {
        let records = store.enumerate_canonical();
        let file = File::create(output_path)?;
        zonefile::write(&records, file)?;
    }
    let write_elapsed = t_write.elapsed();

    if args.print_timing {
        println!("load:        {:?}", load_elapsed);
        println!("placeholder: {:?}", placeholder_elapsed);
        println!("calculate:   {:?}", calc_elapsed);
        println!("verify:      {:?}", verify_elapsed);
        println!("update:      {:?}", update_elapsed);
        println!("write:       {:?}", write_elapsed);
    }

    if args.verify && !verify_ok {
        return Ok(1);
    }
    Ok(0)
}
