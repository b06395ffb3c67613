use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid model metadata {path}: {reason}")]
    Metadata { path: String, reason: String },
    #[error("model {path} could not be prepared: {reason}")]
    Model { path: String, reason: String },
    #[error("model metadata lists no classes")]
    NoClasses,
}

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("no model loaded")]
    NotLoaded,
    #[error("could not prepare input: {0}")]
    Input(String),
    #[error("model run failed: {0}")]
    Run(String),
    #[error("model returned {got} scores for {expected} classes")]
    ShapeMismatch { expected: usize, got: usize },
}

#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("capture device unavailable: {0}")]
    Unavailable(String),
    #[error("capture device access denied")]
    Denied,
    #[error("capture device is closed")]
    Closed,
    #[error("frame capture failed: {0}")]
    Frame(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SampleError {
    #[error("cannot draw {count} unique numbers from [{min}, {max}]")]
    InvalidRange { min: i64, max: i64, count: usize },
}

#[derive(Debug, Error)]
pub enum ImageDecodeError {
    #[error("{name} is not an image ({mime})")]
    NotAnImage { name: String, mime: String },
    #[error("could not decode {name}: {reason}")]
    Decode { name: String, reason: String },
}

#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("could not access preferences at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("preferences at {path} are malformed: {reason}")]
    Parse { path: String, reason: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("config {path} is malformed: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid value for {field}: {reason}")]
    Invalid { field: String, reason: String },
}
