//! Fixed-width field packing into 64-bit words.
//!
//! Fields are placed highest bit first: the first field of a message occupies
//! the top bits of the first word, and each following field sits directly
//! below the previous one. A field that does not fit into what is left of the
//! current word starts at the top of the next word; the unused low bits of the
//! previous word stay zero.

use core::ops::Range;

use bitvec::prelude::*;

use crate::TelemetryError;

pub const WORD_BITS: u32 = 64;
/// Largest message any schema produces.
pub const MAX_WORDS: usize = 5;
/// Upper bound on the number of fields in one message.
pub const MAX_FIELDS: usize = 32;

pub type Words = heapless::Vec<u64, MAX_WORDS>;

fn span(width: u32, lsb: u32) -> Option<Range<usize>> {
    if width == 0 || lsb >= WORD_BITS {
        return None;
    }

    let end = lsb.saturating_add(width).min(WORD_BITS);
    Some(lsb as usize..end as usize)
}

/// Reads `width` bits starting at bit `lsb`. Never fails: a zero width gives 0
/// and bits past the top of the word are ignored.
pub fn get_field(word: u64, width: u32, lsb: u32) -> u64 {
    match span(width, lsb) {
        Some(range) => word.view_bits::<Lsb0>()[range].load_le::<u64>(),
        None => 0,
    }
}

/// Writes the low `width` bits of `value` at bit `lsb`, leaving all other bits
/// untouched. High bits of `value` that do not fit are discarded.
pub fn set_field(word: u64, width: u32, lsb: u32, value: u64) -> u64 {
    let mut word = word;
    if let Some(range) = span(width, lsb) {
        word.view_bits_mut::<Lsb0>()[range].store_le(value);
    }
    word
}

/// Number of words a sequence of field widths packs into.
pub const fn word_count(widths: &[u32]) -> usize {
    let mut words = 0;
    let mut lsb = 0;
    let mut i = 0;
    while i < widths.len() {
        if widths[i] > lsb {
            words += 1;
            lsb = WORD_BITS;
        }
        lsb -= widths[i];
        i += 1;
    }
    words
}

/// Packs fields into words, see the module docs for the layout.
#[derive(Debug)]
pub struct WordWriter<const N: usize> {
    words: heapless::Vec<u64, N>,
    current: u64,
    lsb: u32,
}

impl<const N: usize> Default for WordWriter<N> {
    fn default() -> Self {
        Self {
            words: heapless::Vec::new(),
            current: 0,
            lsb: WORD_BITS,
        }
    }
}

impl<const N: usize> WordWriter<N> {
    pub fn write(&mut self, width: u32, value: u64) -> Result<(), TelemetryError> {
        if width == 0 || width > WORD_BITS {
            return Err(TelemetryError::InvalidWidth(width));
        }

        if width > self.lsb {
            self.flush()?;
        }

        self.lsb -= width;
        self.current = set_field(self.current, width, self.lsb, value);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), TelemetryError> {
        self.words.push(self.current).map_err(|_| TelemetryError::Overflow)?;
        self.current = 0;
        self.lsb = WORD_BITS;
        Ok(())
    }

    pub fn finish(mut self) -> Result<heapless::Vec<u64, N>, TelemetryError> {
        if self.lsb < WORD_BITS {
            self.flush()?;
        }

        Ok(self.words)
    }
}

/// Reads fields back out of words in the order [WordWriter] wrote them.
#[derive(Debug)]
pub struct WordReader<'a> {
    words: &'a [u64],
    index: usize,
    lsb: u32,
}

impl<'a> WordReader<'a> {
    pub fn new(words: &'a [u64]) -> Self {
        Self {
            words,
            index: 0,
            lsb: WORD_BITS,
        }
    }

    pub fn read(&mut self, width: u32) -> Result<u64, TelemetryError> {
        if width == 0 || width > WORD_BITS {
            return Err(TelemetryError::InvalidWidth(width));
        }

        if width > self.lsb {
            self.index += 1;
            self.lsb = WORD_BITS;
        }

        let word = *self.words.get(self.index).ok_or(TelemetryError::OutOfWords)?;
        self.lsb -= width;
        Ok(get_field(word, width, self.lsb))
    }
}

pub fn pack(fields: &[(u64, u32)]) -> Result<Words, TelemetryError> {
    let mut writer = WordWriter::default();
    for (value, width) in fields {
        writer.write(*width, *value)?;
    }

    writer.finish()
}

pub fn unpack(words: &[u64], widths: &[u32]) -> Result<heapless::Vec<u64, MAX_FIELDS>, TelemetryError> {
    let mut reader = WordReader::new(words);
    let mut values = heapless::Vec::new();
    for width in widths {
        values.push(reader.read(*width)?).map_err(|_| TelemetryError::Overflow)?;
    }

    Ok(values)
}
