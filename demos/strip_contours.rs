//! Solve a field across a rectangular strip and print its isolines.
//!
//! Run with: RUST_LOG=debug cargo run --example strip_contours

use isotrace::algo::field::solve_scalar_field_with_progress;
use isotrace::algo::Progress;
use isotrace::prelude::*;
use nalgebra::Point3;

fn create_strip(nx: usize, ny: usize) -> TriMesh {
    let mut vertices = Vec::with_capacity((nx + 1) * (ny + 1));
    let mut faces = Vec::with_capacity(nx * ny * 2);

    for j in 0..=ny {
        for i in 0..=nx {
            vertices.push(Point3::new(i as f64 / ny as f64, j as f64 / ny as f64, 0.0));
        }
    }

    for j in 0..ny {
        for i in 0..nx {
            let v00 = j * (nx + 1) + i;
            let v10 = v00 + 1;
            let v01 = v00 + (nx + 1);
            let v11 = v01 + 1;

            faces.push([v00, v10, v11]);
            faces.push([v00, v11, v01]);
        }
    }

    TriMesh::new(vertices, faces).expect("Failed to build strip")
}

fn main() {
    env_logger::init();

    let (nx, ny) = (40, 10);
    let mesh = create_strip(nx, ny);
    println!(
        "Built strip: {} vertices, {} faces",
        mesh.num_vertices(),
        mesh.num_faces()
    );

    // Pin the left edge to 0 and the right edge to 1
    let constraints: ConstraintSet = (0..=ny)
        .flat_map(|j| [(j * (nx + 1), 0.0), (j * (nx + 1) + nx, 1.0)])
        .collect();

    let progress = Progress::new(|current, total, message| {
        println!("  [{}/{}] {}", current, total, message);
    });

    println!("Solving harmonic field...");
    let field =
        solve_scalar_field_with_progress(&mesh, &constraints, &SolveOptions::default(), &progress)
            .expect("Failed to solve field");

    if let Some((lo, hi)) = field.range() {
        println!("Field range: [{:.4}, {:.4}]", lo, hi);
    }

    println!("Extracting isolines...");
    let lines = extract_isolines(
        &mesh,
        &field,
        &IsoValues::Count(8),
        &ExtractOptions::default().with_parallel(true),
    )
    .expect("Failed to extract isolines");

    for line in &lines {
        match (line.first(), line.last()) {
            (Some(a), Some(b)) => println!(
                "  {:.4}: {:3} points, length {:.3}, ({:.3}, {:.3}) -> ({:.3}, {:.3})",
                line.value(),
                line.len(),
                line.length(),
                a.x,
                a.y,
                b.x,
                b.y
            ),
            _ => println!("  {:.4}: empty", line.value()),
        }
    }

    let flat = lines.to_flat();
    println!(
        "Flattened: {} isolines, {} coordinates",
        flat.counts.len(),
        flat.coords.len()
    );

    println!("Done!");
}
