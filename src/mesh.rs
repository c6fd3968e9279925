//! Triangle meshes loaded from STL and the bounds every frame is projected against

use crate::error::{Error, Result};
use nalgebra::{Point3, Vector3};
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;
use tracing::debug;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl AABB {
    pub fn new(min: Point3<f32>, max: Point3<f32>) -> Self {
        Self { min, max }
    }

    /// Smallest box containing every point, or `None` for no points
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point3<f32>>,
    {
        let mut points = points.into_iter();
        let first = *points.next()?;
        Some(points.fold(Self::new(first, first), |bounds, p| {
            Self::new(bounds.min.inf(p), bounds.max.sup(p))
        }))
    }

    pub fn center(&self) -> Point3<f32> {
        nalgebra::center(&self.min, &self.max)
    }

    pub fn size(&self) -> Vector3<f32> {
        self.max - self.min
    }
}

/// A single facet with its outward normal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub vertices: [Point3<f32>; 3],
    pub normal: Vector3<f32>,
}

impl Triangle {
    pub fn new(vertices: [Point3<f32>; 3], normal: Vector3<f32>) -> Self {
        Self { vertices, normal }
    }

    /// Build a triangle whose normal follows the counter-clockwise winding of `a`, `b`, `c`
    pub fn from_vertices(a: Point3<f32>, b: Point3<f32>, c: Point3<f32>) -> Self {
        let normal = (b - a)
            .cross(&(c - a))
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vector3::zeros);
        Self::new([a, b, c], normal)
    }
}

/// Flat per-vertex positions and normals, three entries per triangle
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    positions: Vec<Point3<f32>>,
    normals: Vec<Vector3<f32>>,
}

impl Mesh {
    pub fn from_triangles<I>(triangles: I) -> Self
    where
        I: IntoIterator<Item = Triangle>,
    {
        let mut mesh = Self::default();
        for tri in triangles {
            for vertex in tri.vertices {
                mesh.positions.push(vertex);
                mesh.normals.push(tri.normal);
            }
        }
        mesh
    }

    /// Load a mesh from an STL file, binary or ASCII
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let input_error = |message: String| Error::Input {
            path: path.to_path_buf(),
            message,
        };

        let mut file = File::open(path).map_err(|e| input_error(e.to_string()))?;
        let mesh = Self::from_reader(&mut file).map_err(|e| input_error(e.to_string()))?;

        debug!(
            path = %path.display(),
            triangles = mesh.triangle_count(),
            "Loaded mesh"
        );
        Ok(mesh)
    }

    /// Parse STL data from any seekable reader
    pub fn from_reader<R: Read + Seek>(reader: &mut R) -> Result<Self> {
        let stl = stl_io::read_stl(reader).map_err(|e| Error::Parse(e.to_string()))?;

        // Each facet keeps its own copy of the shared vertices so the facet
        // normal can be attached per corner.
        let triangles = stl.faces.iter().map(|face| {
            let corner = |i: usize| {
                let v = &stl.vertices[face.vertices[i]];
                Point3::new(v[0], v[1], v[2])
            };
            Triangle::new(
                [corner(0), corner(1), corner(2)],
                Vector3::new(face.normal[0], face.normal[1], face.normal[2]),
            )
        });

        let mesh = Self::from_triangles(triangles);
        if mesh.is_empty() {
            return Err(Error::EmptyMesh);
        }
        Ok(mesh)
    }

    pub fn positions(&self) -> &[Point3<f32>] {
        &self.positions
    }

    pub fn normals(&self) -> &[Vector3<f32>] {
        &self.normals
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// A mesh together with the bounds used to normalize every frame
#[derive(Debug, Clone)]
pub struct MeshBuffer {
    mesh: Mesh,
    bounds: AABB,
    center: Point3<f32>,
    size: Vector3<f32>,
}

impl MeshBuffer {
    /// Compute bounds once, rejecting meshes that cannot be projected onto a grid
    pub fn new(mesh: Mesh) -> Result<Self> {
        let bounds = AABB::from_points(mesh.positions()).ok_or(Error::EmptyMesh)?;
        let size = bounds.size();

        // x and y are the projected axes; z only feeds the depth test
        for (axis, extent) in [('x', size.x), ('y', size.y)] {
            if !extent.is_finite() || extent <= 0.0 {
                return Err(Error::DegenerateGeometry { axis, extent });
            }
        }

        let center = bounds.center();
        debug!(
            vertices = mesh.vertex_count(),
            size = ?(size.x, size.y, size.z),
            center = ?(center.x, center.y, center.z),
            "Prepared mesh buffer"
        );

        Ok(Self {
            mesh,
            bounds,
            center,
            size,
        })
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn positions(&self) -> &[Point3<f32>] {
        self.mesh.positions()
    }

    pub fn normals(&self) -> &[Vector3<f32>] {
        self.mesh.normals()
    }

    pub fn bounds(&self) -> &AABB {
        &self.bounds
    }

    pub fn center(&self) -> Point3<f32> {
        self.center
    }

    pub fn size(&self) -> Vector3<f32> {
        self.size
    }
}

/// Twelve triangles of the axis-aligned cube spanning `min` to `max`,
/// the +z face first
#[cfg(test)]
pub(crate) fn cube_triangles(min: Point3<f32>, max: Point3<f32>) -> Vec<Triangle> {
    let p = |x: bool, y: bool, z: bool| {
        Point3::new(
            if x { max.x } else { min.x },
            if y { max.y } else { min.y },
            if z { max.z } else { min.z },
        )
    };
    let quad = |a, b, c, d| {
        [
            Triangle::from_vertices(a, b, c),
            Triangle::from_vertices(a, c, d),
        ]
    };

    let faces = [
        // +z
        quad(p(false, false, true), p(true, false, true), p(true, true, true), p(false, true, true)),
        // -z
        quad(p(false, false, false), p(false, true, false), p(true, true, false), p(true, false, false)),
        // +x
        quad(p(true, false, false), p(true, true, false), p(true, true, true), p(true, false, true)),
        // -x
        quad(p(false, false, false), p(false, false, true), p(false, true, true), p(false, true, false)),
        // +y
        quad(p(false, true, false), p(false, true, true), p(true, true, true), p(true, true, false)),
        // -y
        quad(p(false, false, false), p(true, false, false), p(true, false, true), p(false, false, true)),
    ];
    faces.into_iter().flatten().collect()
}

/// Binary STL bytes for a set of triangles
#[cfg(test)]
pub(crate) fn stl_bytes(triangles: &[Triangle]) -> Vec<u8> {
    let to_stl = |t: &Triangle| stl_io::Triangle {
        normal: stl_io::Normal::new([t.normal.x, t.normal.y, t.normal.z]),
        vertices: t
            .vertices
            .map(|v| stl_io::Vertex::new([v.x, v.y, v.z])),
    };
    let stl: Vec<stl_io::Triangle> = triangles.iter().map(to_stl).collect();

    let mut bytes = Vec::new();
    stl_io::write_stl(&mut bytes, stl.iter()).expect("in-memory STL write");
    bytes
}
