/// Name of the publish configuration file looked up in the project root
pub const CONFIG_FILE_NAME: &str = "publish.json";

/// Public location of the grid modules used by the documentation site
pub const DOCS_GRIDCHEN_URL: &str = "https://decatur.github.io/grid-chen/gridchen/";
