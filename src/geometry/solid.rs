//! Constructive solid geometry values and their OpenSCAD rendering.
//!
//! A `Solid` is an immutable expression tree. Combinators take `self` by
//! value and hand back a new tree, so building a lamp is a fold over its
//! features. Boolean lists are kept flat: subtracting from a difference
//! appends to its list of cuts instead of nesting another difference.

use crate::error::{LampError, LampResult};
use nalgebra::{Point2, Vector3};
#[cfg(test)]
use nalgebra::{Point3, Rotation3};
use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub enum Solid {
    /// centred on the origin
    Sphere { r: f64 },
    /// base disc on z = 0, axis along +z
    Cylinder { r: f64, h: f64 },
    Cube { size: Vector3<f64>, center: bool },
    /// a polygon in the xy plane extruded from z = 0 to z = height
    Extrusion { points: Vec<Point2<f64>>, height: f64 },
    Union(Vec<Solid>),
    Difference { base: Box<Solid>, cuts: Vec<Solid> },
    /// degrees about x, then y, then z
    Rotate { angles: Vector3<f64>, child: Box<Solid> },
    Translate { offset: Vector3<f64>, child: Box<Solid> },
}

impl Solid {
    pub fn sphere(r: f64) -> Solid {
        Solid::Sphere { r }
    }

    pub fn cylinder(r: f64, h: f64) -> Solid {
        Solid::Cylinder { r, h }
    }

    pub fn cube(size: Vector3<f64>, center: bool) -> Solid {
        Solid::Cube { size, center }
    }

    pub fn extrude(points: Vec<Point2<f64>>, height: f64) -> Solid {
        Solid::Extrusion { points, height }
    }

    pub fn rotate(self, angles: Vector3<f64>) -> Solid {
        Solid::Rotate {
            angles,
            child: Box::new(self),
        }
    }

    pub fn translate(self, offset: Vector3<f64>) -> Solid {
        Solid::Translate {
            offset,
            child: Box::new(self),
        }
    }

    pub fn union(self, other: Solid) -> Solid {
        match self {
            Solid::Union(mut parts) => {
                parts.push(other);
                Solid::Union(parts)
            }
            solid => Solid::Union(vec![solid, other]),
        }
    }

    pub fn difference(self, cut: Solid) -> Solid {
        match self {
            Solid::Difference { base, mut cuts } => {
                cuts.push(cut);
                Solid::Difference { base, cuts }
            }
            solid => Solid::Difference {
                base: Box::new(solid),
                cuts: vec![cut],
            },
        }
    }

    /// whether `p` lies inside the solid (boundary points count as inside)
    #[cfg(test)]
    pub fn contains(&self, p: &Point3<f64>) -> bool {
        match self {
            Solid::Sphere { r } => p.coords.norm() <= *r,
            Solid::Cylinder { r, h } => {
                (0.0..=*h).contains(&p.z) && p.x * p.x + p.y * p.y <= r * r
            }
            Solid::Cube { size, center } => (0..3).all(|i| {
                if *center {
                    p[i].abs() <= size[i] / 2.0
                } else {
                    (0.0..=size[i]).contains(&p[i])
                }
            }),
            Solid::Extrusion { points, height } => {
                (0.0..=*height).contains(&p.z) && polygon_contains(points, p.x, p.y)
            }
            Solid::Union(parts) => parts.iter().any(|s| s.contains(p)),
            Solid::Difference { base, cuts } => {
                base.contains(p) && !cuts.iter().any(|s| s.contains(p))
            }
            Solid::Rotate { angles, child } => {
                child.contains(&(rotation(angles).inverse() * p))
            }
            Solid::Translate { offset, child } => child.contains(&(p - offset)),
        }
    }

    /// the OpenSCAD program for this solid, one statement per line
    pub fn to_scad(&self) -> String {
        let mut out = String::new();
        self.write_scad_to(&mut out, 0);
        out
    }

    fn write_scad_to(&self, out: &mut String, depth: usize) {
        let indent = "    ".repeat(depth);
        // writing into a String cannot fail
        let _ = match self {
            Solid::Sphere { r } => writeln!(out, "{}sphere(r = {});", indent, r),
            Solid::Cylinder { r, h } => {
                writeln!(out, "{}cylinder(r = {}, h = {});", indent, r, h)
            }
            Solid::Cube { size, center } => writeln!(
                out,
                "{}cube(size = {}, center = {});",
                indent,
                vector(size),
                center
            ),
            Solid::Extrusion { points, height } => {
                let points: Vec<String> =
                    points.iter().map(|p| format!("[{}, {}]", p.x, p.y)).collect();
                writeln!(
                    out,
                    "{}linear_extrude(height = {}) polygon(points = [{}]);",
                    indent,
                    height,
                    points.join(", ")
                )
            }
            Solid::Union(parts) => {
                let _ = writeln!(out, "{}union() {{", indent);
                for part in parts {
                    part.write_scad_to(out, depth + 1);
                }
                writeln!(out, "{}}}", indent)
            }
            Solid::Difference { base, cuts } => {
                let _ = writeln!(out, "{}difference() {{", indent);
                base.write_scad_to(out, depth + 1);
                for cut in cuts {
                    cut.write_scad_to(out, depth + 1);
                }
                writeln!(out, "{}}}", indent)
            }
            Solid::Rotate { angles, child } => {
                let _ = writeln!(out, "{}rotate({})", indent, vector(angles));
                child.write_scad_to(out, depth + 1);
                Ok(())
            }
            Solid::Translate { offset, child } => {
                let _ = writeln!(out, "{}translate({})", indent, vector(offset));
                child.write_scad_to(out, depth + 1);
                Ok(())
            }
        };
    }
}

/// the `$fn` directive that fixes how many facets curved surfaces get
pub fn resolution_directive(segments: u32) -> String {
    format!("$fn = {};", segments)
}

/// writes the resolution directive followed by the program for `solid`
pub fn write_scad(path: &Path, segments: u32, solid: &Solid) -> LampResult<()> {
    let file = File::create(path).map_err(|e| LampError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    writeln!(writer, "{}", resolution_directive(segments))
        .and_then(|_| writeln!(writer))
        .and_then(|_| writer.write_all(solid.to_scad().as_bytes()))
        .and_then(|_| writer.flush())
        .map_err(|e| LampError::io(path, e))
}

/// OpenSCAD applies rotate([x, y, z]) as x first, then y, then z
#[cfg(test)]
fn rotation(angles: &Vector3<f64>) -> Rotation3<f64> {
    Rotation3::from_euler_angles(
        angles.x.to_radians(),
        angles.y.to_radians(),
        angles.z.to_radians(),
    )
}

fn vector(v: &Vector3<f64>) -> String {
    format!("[{}, {}, {}]", v.x, v.y, v.z)
}

/// even-odd rule
#[cfg(test)]
fn polygon_contains(points: &[Point2<f64>], x: f64, y: f64) -> bool {
    let n = points.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (pi, pj) = (points[i], points[j]);
        if (pi.y > y) != (pj.y > y) && x < (pj.x - pi.x) * (y - pi.y) / (pj.y - pi.y) + pi.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}
