use std::f32::consts::{PI, TAU};
use std::path::Path;

use anyhow::{ensure, Context};

use crate::render::mesh::MeshVertex;

/// CPU-side indexed triangle mesh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Loads every model in an OBJ file into a single mesh.
///
/// Faces are triangulated. Missing normals default to +Y and missing texture
/// coordinates to (0, 0). Texture `v` is flipped so row 0 of an image maps to
/// the top of the face.
pub fn load_obj(path: &Path) -> anyhow::Result<MeshData> {
    let options = tobj::LoadOptions {
        triangulate: true,
        single_index: true,
        ignore_points: true,
        ignore_lines: true,
    };
    let (models, _materials) = tobj::load_obj(path, &options)
        .with_context(|| format!("failed to parse OBJ {}", path.display()))?;

    let mut out = MeshData::default();
    for model in &models {
        let mesh = &model.mesh;
        let base = out.vertices.len() as u32;
        let count = mesh.positions.len() / 3;

        if mesh.normals.is_empty() {
            log::warn!("mesh '{}' has no normals", model.name);
        }

        for i in 0..count {
            let position = [mesh.positions[3 * i], mesh.positions[3 * i + 1], mesh.positions[3 * i + 2]];
            let normal = match mesh.normals.get(3 * i..3 * i + 3) {
                Some(n) => [n[0], n[1], n[2]],
                None => [0.0, 1.0, 0.0],
            };
            let uv = match mesh.texcoords.get(2 * i..2 * i + 2) {
                Some(t) => [t[0], 1.0 - t[1]],
                None => [0.0, 0.0],
            };
            out.vertices.push(MeshVertex { position, normal, uv });
        }
        out.indices.extend(mesh.indices.iter().map(|i| base + i));
    }

    ensure!(!out.indices.is_empty(), "OBJ {} contains no triangles", path.display());
    log::info!(
        "loaded {}: {} vertices, {} triangles",
        path.display(),
        out.vertices.len(),
        out.triangle_count()
    );
    Ok(out)
}

/// Unit UV sphere with `rings` latitude bands and `segments` longitude bands.
pub fn uv_sphere(rings: u32, segments: u32) -> MeshData {
    let rings = rings.max(2);
    let segments = segments.max(3);

    let mut vertices = Vec::with_capacity(((rings + 1) * (segments + 1)) as usize);
    for r in 0..=rings {
        let v = r as f32 / rings as f32;
        let theta = v * PI;
        for s in 0..=segments {
            let u = s as f32 / segments as f32;
            let phi = u * TAU;
            let n = [theta.sin() * phi.sin(), theta.cos(), theta.sin() * phi.cos()];
            vertices.push(MeshVertex { position: n, normal: n, uv: [u, v] });
        }
    }

    let stride = segments + 1;
    let mut indices = Vec::with_capacity((rings * segments * 6) as usize);
    for r in 0..rings {
        for s in 0..segments {
            let a = r * stride + s;
            let b = a + stride;
            // Counter-clockwise seen from outside.
            indices.extend_from_slice(&[a, b, a + 1, a + 1, b, b + 1]);
        }
    }

    MeshData { vertices, indices }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn sphere_indices_are_in_range() {
        let m = uv_sphere(8, 16);
        assert_eq!(m.triangle_count(), 8 * 16 * 2);
        let n = m.vertices.len() as u32;
        assert!(m.indices.iter().all(|i| *i < n));
    }

    #[test]
    fn sphere_normals_point_outward() {
        let m = uv_sphere(6, 12);
        for v in &m.vertices {
            let n = Vec3::from_array(v.normal);
            assert!((n.length() - 1.0).abs() < 1e-5);
            assert_eq!(v.position, v.normal);
        }
    }

    #[test]
    fn sphere_faces_wind_outward() {
        let m = uv_sphere(6, 12);
        for tri in m.indices.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| Vec3::from_array(m.vertices[i as usize].position));
            let face = (b - a).cross(c - a);
            // Skip slivers at the poles.
            if face.length() < 1e-6 {
                continue;
            }
            assert!(face.dot((a + b + c) / 3.0) > 0.0);
        }
    }

    #[test]
    fn obj_triangle_loads_with_flipped_v() {
        let path = std::env::temp_dir().join(format!("lantern-tri-{}.obj", std::process::id()));
        std::fs::write(
            &path,
            "v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nvt 1 0\nvt 0 1\nvn 0 0 1\nf 1/1/1 2/2/1 3/3/1\n",
        )
        .unwrap();

        let m = load_obj(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(m.triangle_count(), 1);
        assert_eq!(m.vertices.len(), 3);
        assert_eq!(m.vertices[0].uv, [0.0, 1.0]);
        assert_eq!(m.vertices[2].uv, [0.0, 0.0]);
        assert_eq!(m.vertices[1].normal, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn missing_obj_is_an_error() {
        assert!(load_obj(Path::new("definitely/not/here.obj")).is_err());
    }
}
