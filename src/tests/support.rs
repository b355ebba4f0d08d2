use crate::batch::CommandRunner;
use std::ffi::OsString;
use std::io;

/// Records every invocation and answers with scripted exit codes (default 0).
#[derive(Default)]
pub struct RecordingRunner {
    pub calls: Vec<Vec<String>>,
    pub exit_codes: Vec<Option<i32>>,
}

impl RecordingRunner {
    pub fn failing_on(call: usize, code: i32) -> Self {
        let mut exit_codes = vec![Some(0); call];
        exit_codes.push(Some(code));
        Self {
            calls: Vec::new(),
            exit_codes,
        }
    }

    /// Number of file arguments per call, skipping program, leading args and subcommand.
    pub fn batch_sizes(&self, prefix_len: usize) -> Vec<usize> {
        self.calls.iter().map(|c| c.len() - prefix_len).collect()
    }
}

impl CommandRunner for RecordingRunner {
    fn invoke(&mut self, argv: &[OsString]) -> io::Result<Option<i32>> {
        let index = self.calls.len();
        self.calls
            .push(argv.iter().map(|a| a.to_string_lossy().into_owned()).collect());
        Ok(self.exit_codes.get(index).copied().unwrap_or(Some(0)))
    }
}
