//! Transfer-file intake: record parsing, address interning, edge generation.
//!
//! The transfer file is comma-delimited with a header line:
//! `from_address,to_address,amount,time_step`. Addresses are opaque strings
//! mapped to dense integer indices in first-seen order; the multigraph only
//! ever sees the dense indices.

use std::collections::HashMap;
use std::path::Path;

use tracing::info;

use crate::error::DataError;
use crate::types::{TransferEdge, TransferRecord};

/// Append-only address → dense index assignment.
///
/// Indices are handed out in first-seen order and never reused; once an
/// address has an index, re-interning it returns the same index.
#[derive(Debug, Default)]
pub struct AddressInterner {
    indices: HashMap<String, u32>,
    addresses: Vec<String>,
}

impl AddressInterner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the index for `address`, assigning the next free one on first
    /// sight.
    pub fn intern(&mut self, address: &str) -> u32 {
        if let Some(&index) = self.indices.get(address) {
            return index;
        }
        let index = self.addresses.len() as u32;
        self.indices.insert(address.to_owned(), index);
        self.addresses.push(address.to_owned());
        index
    }

    /// Index for an already-seen address, if any.
    pub fn get(&self, address: &str) -> Option<u32> {
        self.indices.get(address).copied()
    }

    /// Reverse lookup: the address assigned to `index`.
    pub fn address(&self, index: u32) -> Option<&str> {
        self.addresses.get(index as usize).map(String::as_str)
    }

    /// Number of distinct addresses seen so far.
    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }
}

/// Reads and parses a transfer file.
///
/// The first line is a header and is skipped; blank lines are ignored. Every
/// data row must have exactly four fields with a parseable amount and time
/// step — anything else is a [`DataError::MalformedRow`] and aborts the run.
pub fn read_transfer_records(path: &Path) -> Result<Vec<TransferRecord>, DataError> {
    let content = std::fs::read_to_string(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut records = Vec::new();
    for (line_number, line) in content.lines().enumerate() {
        if line_number == 0 {
            // header
            continue;
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let parts: Vec<&str> = trimmed.split(',').collect();
        if parts.len() != 4 {
            return Err(DataError::malformed(
                path,
                line_number,
                format!("expected 4 fields, found {}", parts.len()),
            ));
        }

        let amount: f64 = parts[2].trim().parse().map_err(|_| {
            DataError::malformed(path, line_number, format!("bad amount {:?}", parts[2]))
        })?;
        let time_step: i64 = parts[3].trim().parse().map_err(|_| {
            DataError::malformed(path, line_number, format!("bad time_step {:?}", parts[3]))
        })?;

        records.push(TransferRecord {
            from_address: parts[0].trim().to_owned(),
            to_address: parts[1].trim().to_owned(),
            amount,
            time_step,
        });
    }

    info!(
        records = records.len(),
        path = %path.display(),
        "transfer file loaded"
    );
    Ok(records)
}

/// Turns transfer records into dense-index edge triples, interning addresses
/// as a side effect.
///
/// The same generator can be run over the records multiple times (e.g. once
/// per bucket filter); interning is idempotent so the index assignment stays
/// stable across passes.
#[derive(Debug, Default)]
pub struct EdgeGenerator {
    interner: AddressInterner,
}

impl EdgeGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// The interner populated by previous [`generate_edges`] passes.
    ///
    /// [`generate_edges`]: EdgeGenerator::generate_edges
    pub fn interner(&self) -> &AddressInterner {
        &self.interner
    }

    /// Lazily yields `(from_index, to_index, edge)` triples for every record
    /// the exclusion predicate lets through. The predicate sees
    /// `(from, to, amount, time_step)` and returns true to drop the row.
    ///
    /// Exclusion is checked before interning, so an address that only ever
    /// appears in excluded rows never receives an index.
    pub fn generate_edges<'a, F>(
        &'a mut self,
        records: &'a [TransferRecord],
        mut should_exclude: F,
    ) -> impl Iterator<Item = (u32, u32, TransferEdge)> + 'a
    where
        F: FnMut(&str, &str, f64, i64) -> bool + 'a,
    {
        let interner = &mut self.interner;
        records.iter().filter_map(move |record| {
            if should_exclude(
                &record.from_address,
                &record.to_address,
                record.amount,
                record.time_step,
            ) {
                return None;
            }
            let from = interner.intern(&record.from_address);
            let to = interner.intern(&record.to_address);
            Some((
                from,
                to,
                TransferEdge {
                    amount: record.amount,
                    time_step: record.time_step,
                },
            ))
        })
    }
}
