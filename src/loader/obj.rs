//! Parser for the OBJ-style text geometry format.
//!
//! The grammar is line-oriented and case-sensitive: `v x y z` vertex
//! positions, `vn x y z` vertex normals, `f c1 c2 c3 [c4 ...]` faces whose
//! corner tokens are `p`, `p/t`, `p//n` or `p/t/n` with 1-based indices.
//! Texture indices are accepted and ignored. Blank lines, `#` comments and
//! unknown record markers are skipped.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use glamx::Vec3;
use thiserror::Error;

use crate::mesh::{Corner, Face, VertexIndex, ViewerMesh};

/// Errors aborting a model load.
///
/// Every variant is local to the failed load: the previously displayed model
/// is never touched.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The file could not be opened or read.
    #[error("cannot read {}: {source}", path.display())]
    FileUnreadable {
        /// Path of the unreadable file.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A `v` or `vn` record with non-numeric tokens or the wrong token count.
    #[error("line {line}: malformed vertex record")]
    MalformedVertexLine {
        /// 1-based source line number.
        line: usize,
    },

    /// An `f` record with fewer than three corners or a grammatically
    /// invalid corner token (non-integer, non-positive, or too many parts).
    #[error("line {line}: malformed face record")]
    MalformedFaceLine {
        /// 1-based source line number.
        line: usize,
    },

    /// A face references a position or normal index past the end of its array.
    #[error("line {line}: index {index} out of range (array has {limit} entries)")]
    IndexOutOfRange {
        /// 1-based source line number.
        line: usize,
        /// The offending 1-based index.
        index: usize,
        /// Size of the referenced array.
        limit: usize,
    },
}

/// Loads a model from a file.
pub fn load_obj_file<P: AsRef<Path>>(path: P) -> Result<ViewerMesh, ParseError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| ParseError::FileUnreadable {
        path: path.to_owned(),
        source,
    })?;
    parse_obj(&text)
}

/// Parses model text into a [`ViewerMesh`].
///
/// Two linear passes: the first collects every position and normal record,
/// the second resolves faces against the completed arrays. Face records may
/// reference vertices defined later in the file, so indices can only be
/// validated once the arrays are final. Faces are classified into their
/// arity bucket and folded into the unique-edge set during the second pass.
///
/// When the file carries no `vn` records, per-vertex normals are synthesized
/// from face geometry after the second pass.
pub fn parse_obj(text: &str) -> Result<ViewerMesh, ParseError> {
    let mut positions = Vec::new();
    let mut normals = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let mut tokens = match significant_tokens(raw) {
            Some(tokens) => tokens,
            None => continue,
        };

        match tokens.next() {
            Some("v") => positions.push(parse_vec3(&mut tokens, line)?),
            Some("vn") => normals.push(parse_vec3(&mut tokens, line)?),
            _ => {}
        }
    }

    let has_explicit_normals = !normals.is_empty();
    // Without explicit normals, corners default to their position index and
    // synthesis fills one normal slot per vertex.
    let normal_limit = if has_explicit_normals {
        normals.len()
    } else {
        positions.len()
    };

    let mut mesh = ViewerMesh::new(positions, normals);
    let mut edges: HashSet<(VertexIndex, VertexIndex)> = HashSet::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let mut tokens = match significant_tokens(raw) {
            Some(tokens) => tokens,
            None => continue,
        };
        if tokens.next() != Some("f") {
            continue;
        }

        let mut corners = Vec::new();
        for token in tokens {
            corners.push(parse_corner(token, line, mesh.vertex_count(), normal_limit)?);
        }
        if corners.len() < 3 {
            return Err(ParseError::MalformedFaceLine { line });
        }

        for i in 0..corners.len() {
            let a = corners[i].position;
            let b = corners[(i + 1) % corners.len()].position;
            edges.insert(ViewerMesh::canonical_edge(a, b));
        }
        mesh.push_face(Face::new(corners));
    }

    mesh.set_edge_count(edges.len());

    if !has_explicit_normals {
        mesh.synthesize_normals();
    }

    log::debug!(
        "parsed mesh: {} vertices, {} edges, {} faces{}",
        mesh.vertex_count(),
        mesh.edge_count(),
        mesh.face_count(),
        if has_explicit_normals {
            ""
        } else {
            " (normals synthesized)"
        },
    );

    Ok(mesh)
}

/// Tokenizes a line, or `None` if it is blank or a comment.
fn significant_tokens(raw: &str) -> Option<std::str::SplitWhitespace<'_>> {
    let line = raw.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    Some(line.split_whitespace())
}

/// Parses exactly three float tokens.
fn parse_vec3(
    tokens: &mut std::str::SplitWhitespace<'_>,
    line: usize,
) -> Result<Vec3, ParseError> {
    let mut components = [0.0f32; 3];
    for slot in &mut components {
        *slot = tokens
            .next()
            .and_then(|t| t.parse().ok())
            .ok_or(ParseError::MalformedVertexLine { line })?;
    }
    if tokens.next().is_some() {
        return Err(ParseError::MalformedVertexLine { line });
    }
    Ok(Vec3::from(components))
}

/// Parses one `p`, `p/t`, `p//n` or `p/t/n` corner token.
///
/// Indices are 1-based in the source; 0 and negative values are grammar
/// errors. A missing normal index defers to the position index.
fn parse_corner(
    token: &str,
    line: usize,
    position_limit: usize,
    normal_limit: usize,
) -> Result<Corner, ParseError> {
    let mut parts = token.split('/');

    let position = parse_index(parts.next(), line)?;
    let _texture = parts.next(); // ignored
    let normal = match parts.next() {
        Some(part) if !part.is_empty() => Some(parse_index(Some(part), line)?),
        _ => None,
    };
    if parts.next().is_some() {
        return Err(ParseError::MalformedFaceLine { line });
    }

    if position as usize >= position_limit {
        return Err(ParseError::IndexOutOfRange {
            line,
            index: position as usize + 1,
            limit: position_limit,
        });
    }
    let normal = normal.unwrap_or(position);
    if normal as usize >= normal_limit {
        return Err(ParseError::IndexOutOfRange {
            line,
            index: normal as usize + 1,
            limit: normal_limit,
        });
    }

    Ok(Corner { position, normal })
}

/// Parses a 1-based index token and converts it to 0-based.
fn parse_index(part: Option<&str>, line: usize) -> Result<VertexIndex, ParseError> {
    let value: i64 = part
        .filter(|p| !p.is_empty())
        .and_then(|p| p.parse().ok())
        .ok_or(ParseError::MalformedFaceLine { line })?;
    if value < 1 {
        return Err(ParseError::MalformedFaceLine { line });
    }
    Ok((value - 1) as VertexIndex)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{FaceArity, NORMAL_DISPLAY_SCALE};

    const QUAD: &str = "\
# a single quad
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 1.0 1.0 0.0

v 0.0 1.0 0.0
f 1 2 3 4
";

    #[test]
    fn vertex_count_ignores_face_content() {
        let mesh = parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\n").unwrap();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.face_count(), 0);
        assert_eq!(mesh.edge_count(), 0);
    }

    #[test]
    fn quad_yields_four_unique_edges() {
        let mesh = parse_obj(QUAD).unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.face_count(), 1);
        assert_eq!(mesh.edge_count(), 4);
        assert_eq!(mesh.faces(FaceArity::Quad).len(), 1);
    }

    #[test]
    fn shared_edges_are_not_double_counted() {
        // Two triangles sharing the 1-3 diagonal: 5 edges, not 6.
        let mesh = parse_obj("v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3\nf 1 3 4\n").unwrap();
        assert_eq!(mesh.edge_count(), 5);
    }

    #[test]
    fn corner_forms_resolve_the_same_normal() {
        let text = "\
v 0 0 0
v 1 0 0
v 0 1 0
vn 0 0 1
vn 0 1 0
f 1//2 2/7/2 3/9/2
";
        let mesh = parse_obj(text).unwrap();
        let face = &mesh.faces(FaceArity::Triangle)[0];
        for corner in face.corners() {
            assert_eq!(corner.normal, 1);
        }
    }

    #[test]
    fn explicit_normals_are_kept_verbatim() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0.25 0.5 0.75\nf 1//1 2//1 3//1\n";
        let mesh = parse_obj(text).unwrap();
        assert_eq!(mesh.normals().len(), 1);
        assert_eq!(mesh.normals()[0], glamx::Vec3::new(0.25, 0.5, 0.75));
    }

    #[test]
    fn missing_normals_are_synthesized_at_display_scale() {
        let mesh = parse_obj(QUAD).unwrap();
        assert_eq!(mesh.normals().len(), 4);
        for n in mesh.normals() {
            assert!((n.length() - NORMAL_DISPLAY_SCALE).abs() < 1e-6);
        }
    }

    #[test]
    fn two_corner_face_is_malformed() {
        match parse_obj("v 0 0 0\nv 1 0 0\nf 1 2\n") {
            Err(ParseError::MalformedFaceLine { line: 3 }) => {}
            other => panic!("expected MalformedFaceLine, got {:?}", other),
        }
    }

    #[test]
    fn non_positive_indices_are_malformed() {
        assert!(matches!(
            parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 0 1 2\n"),
            Err(ParseError::MalformedFaceLine { line: 4 })
        ));
        assert!(matches!(
            parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf -1 1 2\n"),
            Err(ParseError::MalformedFaceLine { line: 4 })
        ));
    }

    #[test]
    fn out_of_range_position_index_is_reported() {
        match parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 4\n") {
            Err(ParseError::IndexOutOfRange {
                line: 4,
                index: 4,
                limit: 3,
            }) => {}
            other => panic!("expected IndexOutOfRange, got {:?}", other),
        }
    }

    #[test]
    fn out_of_range_normal_index_is_reported() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nf 1//1 2//1 3//2\n";
        assert!(matches!(
            parse_obj(text),
            Err(ParseError::IndexOutOfRange { line: 5, .. })
        ));
    }

    #[test]
    fn forward_references_resolve_against_final_arrays() {
        // The face appears before the vertices it references.
        let text = "f 1 2 3\nv 0 0 0\nv 1 0 0\nv 0 1 0\n";
        let mesh = parse_obj(text).unwrap();
        assert_eq!(mesh.face_count(), 1);
        assert_eq!(mesh.edge_count(), 3);
    }

    #[test]
    fn malformed_vertex_lines_are_rejected() {
        assert!(matches!(
            parse_obj("v 0 0\n"),
            Err(ParseError::MalformedVertexLine { line: 1 })
        ));
        assert!(matches!(
            parse_obj("v 0 0 zero\n"),
            Err(ParseError::MalformedVertexLine { line: 1 })
        ));
        assert!(matches!(
            parse_obj("vn 0 0 1 0\n"),
            Err(ParseError::MalformedVertexLine { line: 1 })
        ));
    }

    #[test]
    fn unknown_records_and_comments_are_skipped() {
        let text = "mtllib scene.mtl\no quad\n# comment\nvt 0 0\n".to_owned() + QUAD;
        let mesh = parse_obj(&text).unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.face_count(), 1);
    }

    #[test]
    fn unreadable_file_is_reported_with_its_path() {
        match load_obj_file("/nonexistent/model.obj") {
            Err(ParseError::FileUnreadable { path, .. }) => {
                assert_eq!(path, PathBuf::from("/nonexistent/model.obj"));
            }
            other => panic!("expected FileUnreadable, got {:?}", other),
        }
    }
}
