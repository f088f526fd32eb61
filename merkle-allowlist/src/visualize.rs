//! Human-friendly rendering of trees and proofs for debugging.

use std::io::{self, Write};

use itertools::Itertools;

use crate::{hash::Hash, proof::AllowlistProof, tree::AllowlistTree};

const HEX_LEN: usize = 8;
const INDENT_SPACES: usize = 4;

/// Pretty rendering into a [`Drawer`].
pub trait Visualize {
    /// Draw `self`, returning the drawer for further output.
    fn visualize<W: Write>(&self, drawer: Drawer<W>) -> io::Result<Drawer<W>>;
}

/// An `io::Write` proxy that indents every new line by the current level.
pub struct Drawer<W: Write> {
    level: usize,
    write: W,
}

impl<W: Write> Drawer<W> {
    /// Start drawing at level zero.
    pub fn new(write: W) -> Self {
        Drawer { level: 0, write }
    }

    /// Indent following lines one more level.
    pub fn down(&mut self) {
        self.level += 1;
    }

    /// Undo one [`down`](Self::down).
    pub fn up(&mut self) {
        self.level = self.level.saturating_sub(1);
    }

    /// Write `buf`, indenting after each newline.
    pub fn write(&mut self, buf: &[u8]) -> io::Result<()> {
        let sep = format!("\n{}", " ".repeat(INDENT_SPACES * self.level));
        let lines = buf.split(|c| *c == b'\n');
        for chunk in Itertools::intersperse(lines, sep.as_bytes()) {
            self.write.write_all(chunk)?;
        }
        Ok(())
    }

    /// Terminate the drawing with a newline and flush.
    pub fn flush(&mut self) -> io::Result<()> {
        self.write.write_all(b"\n")?;
        self.write.flush()
    }
}

/// `01234567..89abcdef` form of a digest.
pub fn short_hex(bytes: &[u8]) -> String {
    let encoded = hex::encode(bytes);
    let remaining = encoded.len().saturating_sub(HEX_LEN);
    if remaining >= HEX_LEN {
        format!("{}..{}", &encoded[..HEX_LEN], &encoded[remaining..])
    } else {
        encoded
    }
}

fn hash_list(hashes: &[Hash]) -> String {
    hashes.iter().map(|h| short_hex(h)).join(", ")
}

impl Visualize for AllowlistTree {
    fn visualize<W: Write>(&self, mut drawer: Drawer<W>) -> io::Result<Drawer<W>> {
        drawer.write(
            format!(
                "allowlist tree ({}, {} leaves, {} layers)",
                self.algorithm(),
                self.leaf_count(),
                self.layer_count()
            )
            .as_bytes(),
        )?;
        drawer.down();
        drawer.write(format!("\nroot: {}", short_hex(&self.root())).as_bytes())?;
        for (level, layer) in self.layers().iter().enumerate().rev() {
            drawer.write(format!("\nlayer {}: [{}]", level, hash_list(layer)).as_bytes())?;
        }
        drawer.up();
        Ok(drawer)
    }
}

impl Visualize for AllowlistProof {
    fn visualize<W: Write>(&self, mut drawer: Drawer<W>) -> io::Result<Drawer<W>> {
        drawer.write(format!("proof ({} siblings)", self.len()).as_bytes())?;
        drawer.down();
        for (step, sibling) in self.siblings().iter().enumerate() {
            drawer.write(format!("\n{}: {}", step, short_hex(sibling)).as_bytes())?;
        }
        drawer.up();
        Ok(drawer)
    }
}

/// Draw `value` into `v`.
pub fn visualize_to_vec<T: Visualize + ?Sized>(v: &mut Vec<u8>, value: &T) -> io::Result<()> {
    let drawer = Drawer::new(v);
    value.visualize(drawer)?;
    Ok(())
}

/// Draw `value` to `out` and finish with a newline.
pub fn visualize_to<W: Write, T: Visualize + ?Sized>(out: W, value: &T) -> io::Result<()> {
    let drawer = Drawer::new(out);
    value.visualize(drawer)?.flush()
}
