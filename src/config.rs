use crate::err::Error;
use http::HeaderValue;
use std::fs;
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 8888;

pub const STREAM_BUFFER_SIZE: usize = 64 * 1024;

#[derive(Debug)]
pub struct ServeConfig {
    pub port: u16,
    pub target: Target,
}

#[derive(Debug)]
pub enum Target {
    File {
        path: PathBuf,
        display_name: String,
        size_bytes: u64,
    },
    Redirect {
        url: HeaderValue,
    },
}

impl ServeConfig {
    /// Resolves the positional argument into a target.
    ///
    /// Anything starting with `http` is taken as a redirect and never touches the filesystem.
    /// The file size is captured here and not checked again when serving.
    pub fn resolve(port: u16, arg: Option<&str>) -> Result<Self, Error> {
        let arg = arg.ok_or(Error::MissingArgument)?;

        if arg.starts_with("http") {
            let url = HeaderValue::from_str(arg).map_err(|_| Error::InvalidTarget {
                target: arg.to_string(),
                reason: "URL cannot be sent in a Location header",
            })?;
            return Ok(Self {
                port,
                target: Target::Redirect { url },
            });
        }

        let path = PathBuf::from(arg);
        let meta = fs::metadata(&path).map_err(|source| Error::NotFound {
            path: path.clone(),
            source,
        })?;

        if meta.is_dir() {
            return Err(Error::InvalidTarget {
                target: arg.to_string(),
                reason: "path is a directory",
            });
        }

        let display_name = match path.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => arg.to_string(),
        };

        Ok(Self {
            port,
            target: Target::File {
                path,
                display_name,
                size_bytes: meta.len(),
            },
        })
    }
}
