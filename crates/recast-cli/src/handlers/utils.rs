//! Shared utilities for command handlers

use crate::cli::InputArgs;
use crate::config::Config;
use crate::error::Result;
use crate::store::PresetStore;
use is_terminal::IsTerminal;
use std::fs;
use std::io::Read;
use tracing::debug;

/// Read the input text from the argument, the file, or piped stdin
///
/// The text is trimmed; an empty string means no input was given.
pub fn read_input(args: &InputArgs) -> Result<String> {
    let stdin = std::io::stdin();
    let piped = !stdin.is_terminal();
    read_input_from(args, stdin.lock(), piped)
}

pub(crate) fn read_input_from(args: &InputArgs, mut stdin: impl Read, piped: bool) -> Result<String> {
    let raw = if let Some(text) = &args.text {
        text.clone()
    } else if let Some(path) = &args.file {
        debug!(path = %path.display(), "Reading input file");
        fs::read_to_string(path)?
    } else if piped {
        debug!("Reading input from stdin");
        let mut buffer = String::new();
        stdin.read_to_string(&mut buffer)?;
        buffer
    } else {
        String::new()
    };

    Ok(raw.trim().to_string())
}

/// Open the preset store named by the configuration
pub fn open_store(config: &Config) -> Result<PresetStore> {
    PresetStore::open(&config.paths.presets_file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn args(text: Option<&str>, file: Option<PathBuf>) -> InputArgs {
        InputArgs {
            text: text.map(str::to_string),
            file,
        }
    }

    #[test]
    fn test_argument_is_trimmed() {
        let input = read_input_from(&args(Some("  long paragraph \n"), None), "ignored".as_bytes(), true);
        assert_eq!(input.unwrap(), "long paragraph");
    }

    #[test]
    fn test_file_input() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("input.txt");
        std::fs::write(&path, "\nfrom file\n\n").unwrap();

        let input = read_input_from(&args(None, Some(path)), "".as_bytes(), false).unwrap();
        assert_eq!(input, "from file");
    }

    #[test]
    fn test_piped_stdin() {
        let input = read_input_from(&args(None, None), " piped text\n".as_bytes(), true).unwrap();
        assert_eq!(input, "piped text");
    }

    #[test]
    fn test_terminal_stdin_is_not_read() {
        let input = read_input_from(&args(None, None), "should not be read".as_bytes(), false).unwrap();
        assert_eq!(input, "");
    }

    #[test]
    fn test_whitespace_only_is_empty() {
        let input = read_input_from(&args(Some(" \t\n "), None), "".as_bytes(), true).unwrap();
        assert!(input.is_empty());
    }
}
