/// Product name stamped in front of the version in every user agent.
pub const PRODUCT_NAME: &str = "ingenieux CloudButler";

/// Source of the product version embedded in the user agent.
pub trait VersionReporter {
    fn version(&self) -> String;
}

/// Reports the version baked in at build time from the `VERSION` file.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildVersion;

impl VersionReporter for BuildVersion {
    fn version(&self) -> String {
        env!("CLOUDBUTLER_VERSION").to_string()
    }
}

impl<F> VersionReporter for F
where
    F: Fn() -> String,
{
    fn version(&self) -> String {
        self()
    }
}

pub fn user_agent(reporter: &dyn VersionReporter) -> String {
    format!("{}/{}", PRODUCT_NAME, reporter.version())
}
