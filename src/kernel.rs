//! Kernel source loading.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Name of the vector-addition kernel entry point.
pub const KERNEL_NAME: &str = "aplusb";

/// Read kernel source from `path`.
///
/// Failure to read, or reading empty content, is a fatal startup error:
/// the usual cause is a working directory that is not the crate root.
pub fn load_kernel_source(path: &Path) -> Result<String> {
    let source = fs::read_to_string(path).map_err(|source| Error::KernelSource {
        path: path.to_path_buf(),
        source,
    })?;
    if source.is_empty() {
        return Err(Error::EmptyKernelSource {
            path: path.to_path_buf(),
        });
    }
    Ok(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_is_fatal() {
        let err = load_kernel_source(Path::new("no/such/kernel.cl")).unwrap_err();
        assert!(matches!(err, Error::KernelSource { .. }));
    }

    #[test]
    fn test_empty_file_is_fatal() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let err = load_kernel_source(file.path()).unwrap_err();
        assert!(matches!(err, Error::EmptyKernelSource { .. }));
    }

    #[test]
    fn test_reads_content() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "__kernel void aplusb() {{}}").unwrap();
        let source = load_kernel_source(file.path()).unwrap();
        assert!(source.contains("aplusb"));
    }
}
