use super::Host;
use super::config::{Config, DEFAULT_CONFIG_FILE};
use crate::Result;
use camino::Utf8PathBuf;
use clap::Parser;
use std::io::Write;

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Output configuration file path (default is `pipeleak.toml` in the current directory)
    #[arg(value_name = "PATH")]
    pub output: Option<Utf8PathBuf>,
}

pub fn init_config<H: Host>(host: &mut H, args: &InitArgs) -> Result<()> {
    let output = args.output.clone().unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_CONFIG_FILE));

    Config::save_default(&output)?;
    let _ = writeln!(host.output(), "Generated default configuration file: {output}");
    Ok(())
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::commands::host::TestHost;

    #[test]
    fn test_init_writes_default_config() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = Utf8PathBuf::from(temp_dir.path().to_string_lossy().to_string()).join("pipeleak.toml");

        let mut host = TestHost::new();
        init_config(&mut host, &InitArgs { output: Some(path.clone()) }).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, super::super::config::DEFAULT_CONFIG_TOML);
        assert!(host.output_str().contains("Generated default configuration file"));
    }

    #[test]
    fn test_init_into_missing_directory_fails() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = Utf8PathBuf::from(temp_dir.path().to_string_lossy().to_string()).join("no/such/dir/pipeleak.toml");

        let mut host = TestHost::new();
        assert!(init_config(&mut host, &InitArgs { output: Some(path) }).is_err());
        assert!(host.output_str().is_empty());
    }
}
