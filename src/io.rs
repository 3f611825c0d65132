use std::error::Error;

use crate::error::ImtError;

pub trait ErrWriter {
    fn write(&mut self, s: &str);
}

pub struct StderrWriter;

impl ErrWriter for StderrWriter {
    fn write(&mut self, s: &str) {
        eprintln!("{}", s);
    }
}

/// Writes `error` followed by every error in its `source` chain.
pub fn report(writer: &mut impl ErrWriter, error: &ImtError) {
    writer.write(&format!("error: {}", error));

    let mut source = error.source();
    while let Some(cause) = source {
        writer.write(&format!("  caused by: {}", cause));
        source = cause.source();
    }
}
