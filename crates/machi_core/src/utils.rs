use std::{error::Error, io, path::Path};

/// Errors that can wrap an IO failure together with the offending path.
pub trait FromIoError: Error {
    fn io_err<P: AsRef<Path>>(path: P, err: io::Error) -> Self;
}

pub fn io_err_mapper<P: AsRef<Path>, E: FromIoError>(path: P) -> impl Fn(io::Error) -> E {
    move |err| E::io_err(path.as_ref(), err)
}

/// Reads a whole text file, tagging a failure with its path.
pub fn read_text<P: AsRef<Path>, E: FromIoError>(path: P) -> Result<String, E> {
    std::fs::read_to_string(path.as_ref()).map_err(io_err_mapper(path.as_ref()))
}

#[cfg(test)]
mod tests {
    use std::{io, path::Path};

    use thiserror::Error;

    use super::*;

    #[derive(Debug, Error)]
    #[error("{path}: {source}")]
    struct TestError {
        path: String,
        source: io::Error,
    }

    impl FromIoError for TestError {
        fn io_err<P: AsRef<Path>>(path: P, err: io::Error) -> Self {
            Self {
                path: path.as_ref().display().to_string(),
                source: err,
            }
        }
    }

    #[test]
    fn missing_file_error_carries_path() {
        let err = read_text::<_, TestError>("definitely/not/here.glsl").unwrap_err();
        assert_eq!(err.path, "definitely/not/here.glsl");
        assert_eq!(err.source.kind(), io::ErrorKind::NotFound);
    }
}
