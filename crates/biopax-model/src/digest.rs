//! Deterministic node ids for synthesized BioPAX nodes.
//!
//! Xrefs and entity references are identified by the external record they
//! describe, not by the element that happened to cite it. Two elements citing
//! `(Ensembl, ENSG001)` must land on the same `UnificationXref` node, so the id
//! is a pure function of `(type, db, identifier)`.
//!
//! We use the same **FNV-1a 64-bit** digest everywhere:
//!
//! - input: `"<type>|<db>|<identifier>"` as UTF-8 bytes
//! - output: `"<type>_<16 lowercase hex digits>"`
//!
//! Notes:
//! - This digest is **not** a security primitive. It only has to be stable
//!   across runs and platforms.
//! - Ids are relative; they resolve against the pathway `@base` when the
//!   document is expanded.

const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x00000100000001b3;

/// FNV-1a 64-bit over arbitrary bytes, as 16 lowercase hex digits.
pub fn fnv1a64_hex(bytes: &[u8]) -> String {
    let mut hash = FNV_OFFSET_BASIS;
    for b in bytes {
        hash ^= (*b) as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    format!("{hash:016x}")
}

/// Stable id for a node describing one external record.
///
/// `node_type` is part of the key: a `ProteinReference` and the
/// `UnificationXref` it points at share `(db, identifier)` but must not share
/// an id.
pub fn record_node_id(node_type: &str, db: &str, identifier: &str) -> String {
    let mut key = String::with_capacity(node_type.len() + db.len() + identifier.len() + 2);
    key.push_str(node_type);
    key.push('|');
    key.push_str(db);
    key.push('|');
    key.push_str(identifier);
    format!("{node_type}_{}", fnv1a64_hex(key.as_bytes()))
}

/// Stable id for a `UnificationXref` node.
pub fn unification_xref_id(db: &str, identifier: &str) -> String {
    record_node_id("UnificationXref", db, identifier)
}
