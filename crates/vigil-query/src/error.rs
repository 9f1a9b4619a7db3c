use thiserror::Error;

/// 用量查询错误，任何一种都会让整次扫描失败
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("monitoring request failed: {0}")]
    Http(#[source] reqwest::Error),

    #[error("monitoring api returned status {code}: {body}")]
    Status { code: u16, body: String },

    #[error("malformed monitoring response: {0}")]
    Malformed(String),

    #[error("monitoring request timed out")]
    Timeout,
}

impl From<reqwest::Error> for QueryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            QueryError::Timeout
        } else {
            QueryError::Http(err)
        }
    }
}
