use sheaf_core::{Driver, Error, Result};

use url::Url;

/// Opens the driver named by a connection URL's scheme.
pub(super) fn connect(url: &str) -> Result<Box<dyn Driver>> {
    let parsed = Url::parse(url)
        .map_err(|err| Error::invalid_connection_url(format!("{err}; url={url}")))?;

    match parsed.scheme() {
        "memory" => connect_memory(&parsed),
        scheme => Err(Error::invalid_connection_url(format!(
            "unsupported driver; scheme={scheme}; url={url}"
        ))),
    }
}

#[cfg(feature = "memory")]
fn connect_memory(_url: &Url) -> Result<Box<dyn Driver>> {
    Ok(Box::new(sheaf_driver_memory::Memory::new()))
}

#[cfg(not(feature = "memory"))]
fn connect_memory(_url: &Url) -> Result<Box<dyn Driver>> {
    Err(Error::invalid_connection_url("`memory` feature not enabled"))
}
