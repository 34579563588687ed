use std::time::Instant;

use canny_edge::{detect_edges_luma, visualize_edges, CannyConfig};
use env_logger::Builder;
use image::open;
use log::info;

fn main() {
    Builder::from_default_env().format_timestamp_nanos().init();

    let mut args = std::env::args().skip(1);
    let path = args.next().unwrap_or_else(|| "test_image/edge.png".to_string());
    let high: f32 = args.next().and_then(|v| v.parse().ok()).unwrap_or(60.0);
    let sigma: f32 = args.next().and_then(|v| v.parse().ok()).unwrap_or(1.0);

    let img = open(&path).unwrap().to_luma8();
    info!("Loaded {}: {}x{}", path, img.width(), img.height());

    let config = CannyConfig::new(high, sigma).unwrap();
    let instance = Instant::now();
    let map = detect_edges_luma(&img, &config).unwrap();
    info!("Canny took {:?}", instance.elapsed());

    map.magnitude_image().save("canny_mag.png").unwrap();
    map.peak_image().save("canny_peaks.png").unwrap();
    map.edge_image().save("canny_final.png").unwrap();
    visualize_edges(&img, &map)
        .save("canny_overlay.png")
        .unwrap();

    info!(
        "{} peaks, {} edge pixels",
        map.peaks.len(),
        map.edge_count()
    );
}
