fn main() {
    #[cfg(feature = "cli")]
    treebench::cli::run();

    #[cfg(not(feature = "cli"))]
    {
        eprintln!("treebench: CLI not enabled. Rebuild with `--features cli`.");
        std::process::exit(1);
    }
}
