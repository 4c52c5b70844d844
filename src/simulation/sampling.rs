//! Point clouds approximating canonical surfaces for collision sampling
//!
//! - `sphere_points` vertices of a subdivided icosahedron on the unit sphere
//! - `cube_points`   a regular grid over the faces of `[-1, 1]^3`

use std::collections::HashMap;

use super::states::NVec3;

/// Vertices of an icosphere after `subdivisions` rounds of edge splitting.
/// 0 gives the 12 icosahedron vertices, each round roughly quadruples faces.
pub fn sphere_points(subdivisions: u32) -> Vec<NVec3> {
    let phi = (1.0 + 5.0_f64.sqrt()) / 2.0;
    let mut vertices: Vec<NVec3> = [
        (-1.0, phi, 0.0), (1.0, phi, 0.0), (-1.0, -phi, 0.0), (1.0, -phi, 0.0),
        (0.0, -1.0, phi), (0.0, 1.0, phi), (0.0, -1.0, -phi), (0.0, 1.0, -phi),
        (phi, 0.0, -1.0), (phi, 0.0, 1.0), (-phi, 0.0, -1.0), (-phi, 0.0, 1.0),
    ]
    .iter()
    .map(|&(x, y, z)| NVec3::new(x, y, z).normalize())
    .collect();

    let mut faces: Vec<[usize; 3]> = vec![
        [0, 11, 5], [0, 5, 1], [0, 1, 7], [0, 7, 10], [0, 10, 11],
        [1, 5, 9], [5, 11, 4], [11, 10, 2], [10, 7, 6], [7, 1, 8],
        [3, 9, 4], [3, 4, 2], [3, 2, 6], [3, 6, 8], [3, 8, 9],
        [4, 9, 5], [2, 4, 11], [6, 2, 10], [8, 6, 7], [9, 8, 1],
    ];

    for _ in 0..subdivisions {
        // shared edges must reuse the same midpoint vertex
        let mut midpoints: HashMap<(usize, usize), usize> = HashMap::new();
        let mut next = Vec::with_capacity(faces.len() * 4);

        for [a, b, c] in faces {
            let ab = midpoint(&mut vertices, &mut midpoints, a, b);
            let bc = midpoint(&mut vertices, &mut midpoints, b, c);
            let ca = midpoint(&mut vertices, &mut midpoints, c, a);
            next.push([a, ab, ca]);
            next.push([b, bc, ab]);
            next.push([c, ca, bc]);
            next.push([ab, bc, ca]);
        }
        faces = next;
    }

    vertices
}

fn midpoint(
    vertices: &mut Vec<NVec3>,
    cache: &mut HashMap<(usize, usize), usize>,
    a: usize,
    b: usize,
) -> usize {
    let key = (a.min(b), a.max(b));
    *cache.entry(key).or_insert_with(|| {
        vertices.push(((vertices[a] + vertices[b]) * 0.5).normalize());
        vertices.len() - 1
    })
}

/// Grid points on the surface of `[-1, 1]^3` with `divisions` cells per edge.
/// `divisions = 1` yields the 8 corners.
pub fn cube_points(divisions: u32) -> Vec<NVec3> {
    let n = divisions.max(1) as i64;
    let coord = |i: i64| -1.0 + 2.0 * i as f64 / n as f64;

    let mut points = Vec::new();
    for i in 0..=n {
        for j in 0..=n {
            for k in 0..=n {
                let on_surface = [i, j, k].iter().any(|&c| c == 0 || c == n);
                if on_surface {
                    points.push(NVec3::new(coord(i), coord(j), coord(k)));
                }
            }
        }
    }
    points
}
