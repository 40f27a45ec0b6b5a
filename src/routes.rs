use crate::body::{self, Completing};
use crate::signal::Completion;
use headers::{ContentLength, HeaderMapExt};
use http::header::{CONTENT_DISPOSITION, LOCATION};
use http::HeaderValue;
use http_body_util::combinators::BoxBody;
use http_body_util::BodyExt;
use hyper::body::{Bytes, Incoming};
use hyper::{Request, Response, StatusCode};
use std::io;
use std::sync::Arc;
use tokio::fs::File;

pub type ResponseBody = Completing<BoxBody<Bytes, io::Error>>;

/// What every request gets answered with.
pub enum Served {
    /// Opened once at startup. Each response streams from a duplicate sharing its read position.
    File {
        file: File,
        display_name: String,
        size_bytes: u64,
    },
    Redirect {
        url: HeaderValue,
    },
}

pub struct State {
    pub served: Served,
    pub done: Arc<Completion>,
}

pub async fn respond_to_request(req: Request<Incoming>, state: &State) -> Response<ResponseBody> {
    let resp = match &state.served {
        Served::Redirect { url } => {
            log::info!(
                "{} {} -> [redirect {}]",
                req.method(),
                req.uri(),
                String::from_utf8_lossy(url.as_bytes())
            );
            let mut resp = Response::new(body::empty());
            *resp.status_mut() = StatusCode::TEMPORARY_REDIRECT;
            resp.headers_mut().insert(LOCATION, url.clone());
            resp
        }
        Served::File {
            file,
            display_name,
            size_bytes,
        } => match serve_file(file, display_name, *size_bytes).await {
            Ok(resp) => {
                log::info!(
                    "{} {} -> [serving {} bytes of {}]",
                    req.method(),
                    req.uri(),
                    size_bytes,
                    display_name
                );
                resp
            }
            Err(e) => {
                log::warn!("{} {} -> [file error] {}", req.method(), req.uri(), e);
                let mut resp = Response::new(body::empty());
                *resp.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
                resp
            }
        },
    };

    resp.map(|body| Completing::new(body, Arc::clone(&state.done)))
}

async fn serve_file(
    file: &File,
    display_name: &str,
    size_bytes: u64,
) -> Result<Response<BoxBody<Bytes, io::Error>>, io::Error> {
    let disposition = HeaderValue::try_from(attachment(display_name))
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    let file = file.try_clone().await?;

    let mut resp = Response::new(body::from_file(file).boxed());
    resp.headers_mut().insert(CONTENT_DISPOSITION, disposition);
    resp.headers_mut().typed_insert(ContentLength(size_bytes));
    Ok(resp)
}

fn attachment(display_name: &str) -> String {
    let mut quoted = String::with_capacity(display_name.len());
    for c in display_name.chars() {
        if c == '"' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    format!("attachment; filename=\"{}\"", quoted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attachment_plain_name() {
        assert_eq!(
            attachment("hello.txt"),
            "attachment; filename=\"hello.txt\""
        );
    }

    #[test]
    fn attachment_escapes_quotes() {
        assert_eq!(
            attachment(r#"say "hi"\.txt"#),
            r#"attachment; filename="say \"hi\"\\.txt""#
        );
    }

    #[test]
    fn attachment_keeps_unicode() {
        let value = attachment("résumé.pdf");
        assert!(HeaderValue::try_from(value).is_ok());
    }
}
