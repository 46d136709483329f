use std::io::Write;

/// Where the commands send their reports.
///
/// The animation itself draws straight to stderr through the progress bar; a host only
/// carries the text a command prints once it is done (the cycle summary, `init` and
/// `validate` results) and the exit code for a failed validation.
pub trait Host: Send + Sync {
    /// Destination for results, stdout for the real binary.
    fn output(&mut self) -> impl Write;

    /// Destination for failure reports, stderr for the real binary.
    fn error(&mut self) -> impl Write;

    /// Set the process exit status. Test hosts just record the code.
    fn exit(&mut self, code: i32);
}

/// Test host that captures output to in-memory buffers
#[cfg(test)]
pub struct TestHost {
    pub output_buf: Vec<u8>,
    pub error_buf: Vec<u8>,
    pub exit_code: Option<i32>,
}

#[cfg(test)]
impl TestHost {
    pub const fn new() -> Self {
        Self {
            output_buf: Vec::new(),
            error_buf: Vec::new(),
            exit_code: None,
        }
    }

    pub fn output_str(&self) -> String {
        String::from_utf8_lossy(&self.output_buf).into_owned()
    }

    pub fn error_str(&self) -> String {
        String::from_utf8_lossy(&self.error_buf).into_owned()
    }
}

#[cfg(test)]
impl Host for TestHost {
    fn output(&mut self) -> impl Write {
        &mut self.output_buf
    }

    fn error(&mut self) -> impl Write {
        &mut self.error_buf
    }

    fn exit(&mut self, code: i32) {
        self.exit_code = Some(code);
    }
}
