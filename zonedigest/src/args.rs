//! CLI argument definition and parsing.

use std::env;
use std::path::PathBuf;
use std::process;

use owo_colors::OwoColorize;

#[derive(Clone, Debug)]
pub struct Args {
    pub origin: String,
    pub zonefile: Option<PathBuf>,
    pub calculate: bool,
    pub verify: bool,
    pub placeholders: Vec<u8>,
    pub signing_key: Option<PathBuf>,
    pub update_file: Option<PathBuf>,
    pub output_file: Option<PathBuf>,
    pub print_timing: bool,
    pub quiet: bool,
    pub tree_depth: Option<usize>,
    pub tree_width: Option<usize>,
}

enum ConsumeNext {
    Placeholder,
    SigningKey,
    UpdateFile,
    OutputFile,
    TreeDepth,
    TreeWidth,
}

const MAX_PLACEHOLDERS: usize = 10;

impl Args {
    pub fn parse() -> Self {
        // skip executable name
        let args: Vec<String> = env::args().skip(1).collect();

        let mut positional = Vec::new();
        let mut calculate = false;
        let mut verify = false;
        let mut placeholders = Vec::new();
        let mut signing_key = None;
        let mut update_file = None;
        let mut output_file = None;
        let mut print_timing = false;
        let mut quiet = false;
        let mut tree_depth = None;
        let mut tree_width = None;

        let mut consume_next = None;

        for arg in args {
            if let Some(to_consume) = &consume_next {
                match to_consume {
                    ConsumeNext::Placeholder => match arg.parse::<u8>() {
                        Ok(val) => {
                            if placeholders.len() >= MAX_PLACEHOLDERS {
                                err(format!(
                                    "At most {} -p flags are allowed.",
                                    MAX_PLACEHOLDERS
                                ));
                            }
                            placeholders.push(val);
                        }
                        Err(_) => err(format!("Invalid digest algorithm: {}.", arg)),
                    },
                    ConsumeNext::SigningKey => signing_key = Some(PathBuf::from(arg)),
                    ConsumeNext::UpdateFile => update_file = Some(PathBuf::from(arg)),
                    ConsumeNext::OutputFile => output_file = Some(PathBuf::from(arg)),
                    ConsumeNext::TreeDepth => match arg.parse::<usize>() {
                        Ok(val) => tree_depth = Some(val),
                        Err(_) => err(format!("Invalid tree depth: {}.", arg)),
                    },
                    ConsumeNext::TreeWidth => match arg.parse::<usize>() {
                        Ok(val) => tree_width = Some(val),
                        Err(_) => err(format!("Invalid tree width: {}.", arg)),
                    },
                }
                consume_next = None;
            } else if let Some(option) = arg.strip_prefix('-') {
                match option {
                    "h" | "-help" => {
                        print_help();
                        process::exit(0);
                    }
                    "V" | "-version" => {
                        print_version();
                        process::exit(0);
                    }
                    "c" => calculate = true,
                    "v" => verify = true,
                    "t" => print_timing = true,
                    "q" => quiet = true,
                    "p" => consume_next = Some(ConsumeNext::Placeholder),
                    "z" => consume_next = Some(ConsumeNext::SigningKey),
                    "u" => consume_next = Some(ConsumeNext::UpdateFile),
                    "o" => consume_next = Some(ConsumeNext::OutputFile),
                    "D" => consume_next = Some(ConsumeNext::TreeDepth),
                    "W" => consume_next = Some(ConsumeNext::TreeWidth),
                    x => err(format!("Invalid option: -{}.", x)),
                }
            } else {
                positional.push(arg);
            }
        }

        if consume_next.is_some() {
            err("Missing argument for the last option given.");
        }

        if positional.is_empty() || positional.len() > 2 {
            err("Expected exactly one or two positional arguments: origin [zonefile].");
        }

        if tree_depth.is_some() != tree_width.is_some() {
            err("-D and -W must be given together.");
        }
        if tree_width == Some(0) {
            err("-W must be nonzero.");
        }

        let origin = positional[0].clone();
        let zonefile = positional.get(1).map(PathBuf::from);

        Self {
            origin,
            zonefile,
            calculate,
            verify,
            placeholders,
            signing_key,
            update_file,
            output_file,
            print_timing,
            quiet,
            tree_depth,
            tree_width,
        }
    }
}

macro_rules! var {
    ($var:expr) => {
        $var.if_supports_color(owo_colors::Stream::Stdout, |s| s.green())
    };
}

macro_rules! printopt {
    ($opt:expr, $desc:expr) => {
        println!(
            "\t    {:<19} ({})",
            $opt.if_supports_color(owo_colors::Stream::Stdout, |s| s.yellow()),
            $desc,
        )
    };
}

fn print_help() {
    let output = owo_colors::Stream::Stdout;
    print!("{}", "Usage:".if_supports_color(output, |s| s.purple()));
    println!(
        "\tzonedigest {} [{}] [{}]",
        var!("origin"),
        var!("zonefile"),
        var!("options")
    );
    println!();

    println!("{}", "Where:".if_supports_color(output, |s| s.purple()));
    println!(
        "\t{} is the domain name at the top of the zone",
        var!("origin")
    );
    println!();
    println!(
        "\t{} is the zone file to read; standard input if omitted",
        var!("zonefile")
    );
    println!();

    println!("\t{} is one or more of the following:", var!("options"));
    printopt!("-h | --help", "print this help message");
    printopt!("-V | --version", "print the version of zonedigest");
    printopt!("-c", "calculate digest(s) and patch apex records");
    printopt!("-v", "verify digest(s); exit status nonzero on mismatch");
    printopt!(
        "-p <algorithm>",
        "add a placeholder apex digest (repeatable, up to 10)"
    );
    printopt!(
        "-z <keyfile>",
        "zone-signing key file; enables resigning of digest RRSIGs"
    );
    printopt!("-u <file>", "apply an incremental update file after load");
    printopt!("-o <file>", "write the resulting zone to file");
    printopt!("-t", "print CPU-time breakdown to stdout");
    printopt!("-q", "quiet mode (errors only)");
    printopt!("-D <depth>", "tree depth (tree variant only, with -W)");
    printopt!("-W <width>", "tree width (tree variant only, with -D)");
    println!();

    println!("Note: the order of the arguments does not matter.");
}

fn print_version() {
    println!("zonedigest v{}", env!("CARGO_PKG_VERSION"));
}

fn err(msg: impl AsRef<str>) -> ! {
    eprintln!("{}", msg.as_ref());
    process::exit(2)
}
