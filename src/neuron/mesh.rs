//! Wavefront OBJ Mesh Module
//! Reads vertices and faces; polygons are fan-triangulated.

use crate::error::{AccessError, Result};

/// Triangle mesh with zero-based face indices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<[f64; 3]>,
    pub faces: Vec<[usize; 3]>,
}

impl Mesh {
    /// Axis-aligned bounding box as `(min, max)`, or `None` for an empty mesh.
    pub fn bounds(&self) -> Option<([f64; 3], [f64; 3])> {
        let first = *self.vertices.first()?;
        Some(self.vertices.iter().fold((first, first), |(mut lo, mut hi), v| {
            for axis in 0..3 {
                lo[axis] = lo[axis].min(v[axis]);
                hi[axis] = hi[axis].max(v[axis]);
            }
            (lo, hi)
        }))
    }
}

/// Parse OBJ text. Only `v` and `f` records are used.
pub fn parse_obj(bytes: &[u8]) -> Result<Mesh> {
    let text = std::str::from_utf8(bytes).map_err(|e| AccessError::parse("obj", e))?;
    let mut mesh = Mesh::default();

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let mut parts = line.split_whitespace();
        match parts.next() {
            Some("v") => {
                let coords: Vec<f64> = parts
                    .take(3)
                    .map(|p| p.parse::<f64>())
                    .collect::<std::result::Result<_, _>>()
                    .map_err(|e| AccessError::parse("obj", format!("line {line_no}: {e}")))?;
                if coords.len() != 3 {
                    return Err(AccessError::parse(
                        "obj",
                        format!("line {line_no}: vertex needs 3 coordinates"),
                    ));
                }
                mesh.vertices.push([coords[0], coords[1], coords[2]]);
            }
            Some("f") => {
                let refs = parts
                    .map(|p| resolve_index(p, mesh.vertices.len(), line_no))
                    .collect::<Result<Vec<usize>>>()?;
                if refs.len() < 3 {
                    return Err(AccessError::parse(
                        "obj",
                        format!("line {line_no}: face needs at least 3 vertices"),
                    ));
                }
                for i in 1..refs.len() - 1 {
                    mesh.faces.push([refs[0], refs[i], refs[i + 1]]);
                }
            }
            _ => {}
        }
    }

    Ok(mesh)
}

/// Resolve a face reference (`i`, `i/t`, `i//n`, `i/t/n`; negative is relative)
/// against the vertices seen so far.
fn resolve_index(token: &str, n_vertices: usize, line_no: usize) -> Result<usize> {
    let raw = token.split('/').next().unwrap_or(token);
    let index: i64 = raw
        .parse()
        .map_err(|_| AccessError::parse("obj", format!("line {line_no}: bad vertex index {token}")))?;
    let resolved = match index {
        i if i > 0 => i - 1,
        i if i < 0 => n_vertices as i64 + i,
        _ => -1,
    };
    if resolved < 0 || resolved >= n_vertices as i64 {
        return Err(AccessError::parse(
            "obj",
            format!("line {line_no}: vertex index {index} out of range"),
        ));
    }
    Ok(resolved as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUAD: &str = "\
# unit square
o square
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vn 0 0 1
f 1//1 2//1 3//1 4//1
";

    #[test]
    fn quad_is_two_triangles() {
        let mesh = parse_obj(QUAD.as_bytes()).unwrap();
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.faces, vec![[0, 1, 2], [0, 2, 3]]);
        assert_eq!(mesh.bounds(), Some(([0.0, 0.0, 0.0], [1.0, 1.0, 0.0])));
    }

    #[test]
    fn negative_indices_are_relative() {
        let mesh = parse_obj(b"v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\n").unwrap();
        assert_eq!(mesh.faces, vec![[0, 1, 2]]);
    }

    #[test]
    fn out_of_range_face() {
        let err = parse_obj(b"v 0 0 0\nf 1 2 3\n").unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn empty_mesh_has_no_bounds() {
        assert_eq!(parse_obj(b"").unwrap().bounds(), None);
    }
}
