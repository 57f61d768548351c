//! Plain-text persistence: one `key value` record per line.
//!
//! Files are opened for the duration of a single call and closed before it
//! returns. Loading is whitespace-generic, so several records may share a
//! line. The first token pair that does not parse ends the load; the rest of
//! the input is ignored.

use crate::error::PersistError;
use crate::hash_table::HashTable;
use core::fmt::Display;
use core::hash::{BuildHasher, Hash};
use core::str::FromStr;
use log::{debug, warn};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

impl<K, V, S> HashTable<K, V, S>
where
    K: Eq + Hash + FromStr,
    V: PartialEq + FromStr,
    S: BuildHasher,
{
    /// Inserts every record in the file at `path`.
    ///
    /// Fails without touching the table if the file cannot be opened.
    /// Returns the number of records passed to `insert`.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<usize, PersistError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| PersistError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let records = self.load_from(file)?;
        debug!("loaded {} records from {}", records, path.display());
        Ok(records)
    }

    /// Reader form of [`load`](Self::load).
    ///
    /// Records are inserted as they are read. A token that is not UTF-8 or
    /// does not parse ends the load like any other malformed token; an I/O
    /// error while reading returns `PersistError::Read` and keeps the
    /// records already inserted.
    pub fn load_from<R: Read>(&mut self, reader: R) -> Result<usize, PersistError> {
        let mut tokens = Tokens::new(BufReader::new(reader));
        let mut records = 0;
        while let Some(key_tok) = tokens.next_token().map_err(PersistError::Read)? {
            let Some(key) = parse_token::<K>(&key_tok) else {
                warn!(
                    "stopping load at unparsable key token {:?}",
                    String::from_utf8_lossy(&key_tok)
                );
                break;
            };
            let Some(value_tok) = tokens.next_token().map_err(PersistError::Read)? else {
                warn!(
                    "discarding dangling key token {:?}",
                    String::from_utf8_lossy(&key_tok)
                );
                break;
            };
            let Some(value) = parse_token::<V>(&value_tok) else {
                warn!(
                    "stopping load at unparsable value token {:?} for key {:?}",
                    String::from_utf8_lossy(&value_tok),
                    String::from_utf8_lossy(&key_tok)
                );
                break;
            };
            self.insert(key, value);
            records += 1;
        }
        Ok(records)
    }
}

fn parse_token<T: FromStr>(tok: &[u8]) -> Option<T> {
    core::str::from_utf8(tok).ok()?.parse().ok()
}

/// Whitespace-separated byte tokens pulled from a buffered reader.
struct Tokens<R> {
    reader: R,
    buf: Vec<u8>,
}

impl<R: BufRead> Tokens<R> {
    fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
        }
    }

    fn next_token(&mut self) -> io::Result<Option<Vec<u8>>> {
        loop {
            let available = match self.reader.fill_buf() {
                Ok(bytes) => bytes,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            if available.is_empty() {
                break;
            }
            let mut used = 0;
            let mut complete = false;
            for &b in available {
                used += 1;
                if b.is_ascii_whitespace() {
                    if !self.buf.is_empty() {
                        complete = true;
                        break;
                    }
                } else {
                    self.buf.push(b);
                }
            }
            self.reader.consume(used);
            if complete {
                break;
            }
        }
        if self.buf.is_empty() {
            Ok(None)
        } else {
            Ok(Some(core::mem::take(&mut self.buf)))
        }
    }
}

impl<K, V, S> HashTable<K, V, S>
where
    K: Display,
    V: Display,
{
    /// Writes every entry to `path`, one `key value` record per line, in
    /// bucket order. An empty table produces an empty file.
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), PersistError> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| PersistError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        self.write_to(BufWriter::new(file))?;
        debug!("wrote {} records to {}", self.len(), path.display());
        Ok(())
    }

    /// Writer form of [`write_to_file`](Self::write_to_file).
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<(), PersistError> {
        self.write_records(&mut writer)
            .and_then(|()| writer.flush())
            .map_err(PersistError::Write)
    }

    fn write_records<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        for (k, v) in self.iter() {
            writeln!(writer, "{} {}", k, v)?;
        }
        Ok(())
    }
}
