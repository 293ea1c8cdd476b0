#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("can't set up a docker client from the environment")]
    Connect(#[source] bollard::errors::Error),
    #[error("listing containers failed")]
    List(#[source] bollard::errors::Error),
    #[error("stats request for `{container}` failed")]
    Stats {
        container: String,
        #[source]
        source: bollard::errors::Error,
    },
    #[error("stats stream of `{container}` ended without a sample")]
    EmptyStats { container: String },
}

pub type Result<T> = std::result::Result<T, Error>;
