use std::time::Instant;

use canny_edge::{detect_edges_batch, grid_from_luma, CannyConfig};
use env_logger::Builder;
use image::open;
use log::{info, warn};

fn main() {
    Builder::from_default_env().format_timestamp_nanos().init();

    let paths: Vec<String> = std::env::args().skip(1).collect();
    if paths.is_empty() {
        warn!("usage: batch <image> [<image> ...]");
        return;
    }

    let grids: Vec<_> = paths
        .iter()
        .map(|p| grid_from_luma(&open(p).unwrap().to_luma8()))
        .collect();

    let config = CannyConfig::default();
    let instance = Instant::now();
    let results = detect_edges_batch(&grids, &config);
    info!("Processed {} images in {:?}", grids.len(), instance.elapsed());

    for (path, result) in paths.iter().zip(results) {
        match result {
            Ok(map) => {
                let out = format!("{path}.canny.png");
                map.edge_image().save(&out).unwrap();
                info!("{path}: {} edge pixels -> {out}", map.edge_count());
            }
            Err(err) => warn!("{path}: {err}"),
        }
    }
}
