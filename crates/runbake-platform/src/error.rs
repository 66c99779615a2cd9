use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to spawn `{cmd}`")]
    CommandFailed { cmd: String, source: std::io::Error },

    #[error("`{cmd}` exited with {}", describe_code(.code))]
    ExitStatus { cmd: String, code: Option<i32> },

    #[error("`{cmd}` wrote non UTF-8 output")]
    NonUtf8Output { cmd: String },
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "no status (terminated by signal)".to_string(),
    }
}
