//! Test data builders for input and config files

use oems_rs::config::AppConfig;
use oems_rs::{InputFormat, OutputFormat};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Builder for a scratch directory holding an input file and a config
pub struct RunDirBuilder {
    contents: Vec<u8>,
    format: InputFormat,
    output: OutputFormat,
    workers: usize,
}

impl RunDirBuilder {
    pub fn new() -> Self {
        Self {
            contents: b"53819274\n".to_vec(),
            format: InputFormat::Digits,
            output: OutputFormat::Lines,
            workers: AppConfig::default().workers,
        }
    }

    pub fn contents(mut self, contents: &[u8]) -> Self {
        self.contents = contents.to_vec();
        self
    }

    pub fn format(mut self, format: InputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn output(mut self, output: OutputFormat) -> Self {
        self.output = output;
        self
    }

    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn build(self) -> RunDir {
        let dir = tempfile::tempdir().expect("create temp dir");
        let input = dir.path().join("numbers");
        std::fs::write(&input, &self.contents).expect("write input file");

        let mut config = AppConfig::default().with_input_path(&input);
        config.workers = self.workers;
        config.input.format = self.format;
        config.output.format = self.output;
        let config_path = dir.path().join("oems.toml");
        config.save(&config_path).expect("write config file");

        RunDir {
            dir,
            input,
            config_path,
        }
    }
}

/// A scratch directory; removed on drop
pub struct RunDir {
    dir: TempDir,
    pub input: PathBuf,
    pub config_path: PathBuf,
}

impl RunDir {
    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_dir_builder() {
        let run = RunDirBuilder::new().contents(b"00000000").workers(7).build();
        assert_eq!(std::fs::read(&run.input).unwrap(), b"00000000");
        let config = AppConfig::load(&run.config_path).unwrap();
        assert_eq!(config.workers, 7);
        assert_eq!(config.input.path, run.input);
        assert!(run.path().exists());
    }
}
