use crate::api::ApiError;

impl From<ApiError> for eyre::Error {
    fn from(err: ApiError) -> eyre::Error {
        eyre::eyre!("{err}")
    }
}
