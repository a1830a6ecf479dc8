use std::{env, fs, path::PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=OUT_DIR");

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let completions_dir = out_dir.join("completions");

    fs::create_dir_all(&completions_dir).unwrap();

    let mut cmd = clap::Command::new("quge")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Quge Contributors")
        .about("Download serialized novels from biquge-family sites as e-books")
        .arg(clap::arg!([URL] "Table-of-contents URL of the book"))
        .arg(
            clap::arg!(-o --output <FILE> "Output file (default: book title plus extension)")
                .value_name("FILE")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            clap::arg!(-f --format <FORMAT> "Output format (epub, text, json)")
                .value_name("FORMAT")
                .default_value("epub")
                .value_parser(["epub", "text", "json"]),
        )
        .arg(clap::arg!(--timeout <SECS> "HTTP timeout in seconds").default_value("60"))
        .arg(clap::arg!(--retries <N> "Attempts per page before giving up").default_value("3"))
        .arg(
            clap::Arg::new("user_agent")
                .long("user-agent")
                .value_name("UA")
                .help("Custom User-Agent for HTTP requests"),
        )
        .arg(clap::arg!(-j --concurrency <N> "Chapter pages fetched concurrently").default_value("1"))
        .arg(clap::arg!(--check "Only check whether the URL belongs to a supported site"))
        .arg(
            clap::Arg::new("list_sites")
                .long("list-sites")
                .action(clap::ArgAction::SetTrue)
                .help("List supported sites and exit"),
        )
        .arg(clap::arg!(-v --verbose "Enable debug logging"));

    clap_complete::generate_to(clap_complete::shells::Bash, &mut cmd, "quge", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Zsh, &mut cmd, "quge", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Fish, &mut cmd, "quge", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::PowerShell, &mut cmd, "quge", &completions_dir).unwrap();

    println!(
        "cargo:warning=Shell completions generated in: {}",
        completions_dir.display()
    );
}
