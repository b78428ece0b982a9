use argh::FromArgs;
use glam::DVec3;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::path::PathBuf;

use scanmesh::geometry::ColoredPoint;
use scanmesh::{ReconstructionConfig, SurfaceMethod};

#[derive(FromArgs)]
/// Reconstruct a mesh from synthetic sphere scans
struct Args {
    /// path to a JSON reconstruction config, overrides the other flags
    #[argh(option)]
    config: Option<PathBuf>,

    /// number of scans to merge
    #[argh(option, default = "2")]
    num_scans: usize,

    /// number of sphere points per scan
    #[argh(option, default = "5000")]
    num_points: usize,

    /// number of background points per scan
    #[argh(option, default = "250")]
    num_background: usize,

    /// downsampling voxel size
    #[argh(option, default = "0.01")]
    voxel_size: f64,

    /// maximum triangle edge length of the greedy triangulation
    #[argh(option, default = "0.1")]
    max_edge_length: f64,

    /// surface with voxel cubes of this size instead of greedy triangulation
    #[argh(option)]
    cube_size: Option<f64>,

    /// skip ICP registration when merging the scans
    #[argh(switch)]
    no_icp: bool,

    /// random seed
    #[argh(option, default = "42")]
    seed: u64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let config = match &args.config {
        Some(path) => ReconstructionConfig::from_file(path)?,
        None => ReconstructionConfig {
            use_icp: !args.no_icp,
            voxel_size: args.voxel_size,
            surface: match args.cube_size {
                Some(voxel_size) => SurfaceMethod::VoxelCubes {
                    voxel_size,
                    iso_value: 0.5,
                },
                None => SurfaceMethod::Greedy {
                    max_edge_length: args.max_edge_length,
                },
            },
            ..Default::default()
        },
    };
    log::debug!("config: {config:?}");

    let mut rng = StdRng::seed_from_u64(args.seed);
    let scans = (0..args.num_scans)
        .map(|_| synthetic_scan(&mut rng, args.num_points, args.num_background))
        .collect::<Vec<_>>();
    for (i, scan) in scans.iter().enumerate() {
        println!("Scan {i}: #{} points", scan.len());
    }

    let points = scanmesh::prepare_points(&scans, &config)?;
    println!("Cleaned cloud: #{} points", points.len());

    let mesh = scanmesh::build_surface(&points, &config)?;
    println!(
        "Mesh: #{} vertices, #{} triangles",
        mesh.num_vertices(),
        mesh.num_triangles()
    );
    if let Some(bounds) = mesh.bounding_box() {
        println!("Bounds: {:?} .. {:?}", bounds.min, bounds.max);
    }

    Ok(())
}

/// Sample a sphere of radius 0.15 around (0, 0, 0.5) inside a cluttered box.
fn synthetic_scan(rng: &mut StdRng, num_points: usize, num_background: usize) -> Vec<ColoredPoint> {
    let center = DVec3::new(0.0, 0.0, 0.5);
    let box_size = DVec3::new(0.6, 0.4, 0.4);

    let mut points = Vec::with_capacity(num_points + num_background);
    for _ in 0..num_points {
        let z = rng.random::<f64>() * 2.0 - 1.0;
        let phi = rng.random::<f64>() * std::f64::consts::TAU;
        let r = (1.0 - z * z).sqrt();
        let direction = DVec3::new(r * phi.cos(), r * phi.sin(), z);
        let color = direction * 0.5 + 0.5;
        points.push(ColoredPoint::new(center + direction * 0.15, color));
    }
    for _ in 0..num_background {
        let u = DVec3::new(rng.random(), rng.random(), rng.random());
        points.push(ColoredPoint::new(
            center + (u - 0.5) * box_size,
            DVec3::splat(0.5),
        ));
    }
    points
}
