use serde::Deserialize;

/// A raster tile source, addressed through a Leaflet style url template.
#[derive(Clone, PartialEq, Debug, Deserialize)]
pub struct TileServer {
    pub name: String,
    pub url: String,
    pub attribution: String,
}

impl TileServer {
    pub fn tile_url(&self, z: u32, x: u32, y: u32) -> String {
        self.url
            .replace("{s}", "a")
            .replace("{r}", "")
            .replace("{z}", &z.to_string())
            .replace("{x}", &x.to_string())
            .replace("{y}", &y.to_string())
    }
}
