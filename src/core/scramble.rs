use fnv::FnvHashMap;
use rand::seq::SliceRandom;
use rand::Rng;
use smallvec::SmallVec;

// QWERTY rows; neighbours are taken from the same row and the rows directly
// above and below at adjacent offsets.
const ROWS: [&str; 4] = ["1234567890", "qwertyuiop", "asdfghjkl", "zxcvbnm"];

const FALLBACK: &[u8] = b"abcdefghijklmnopqrstuvwxyz";

type Neighbours = SmallVec<[char; 8]>;

/// Picks plausible "mistyped" stand-ins for characters.
#[derive(Clone, Debug)]
pub struct Scrambler {
    neighbours: FnvHashMap<char, Neighbours>,
}

impl Default for Scrambler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scrambler {
    pub fn new() -> Self {
        let grid: Vec<Vec<char>> = ROWS.iter().map(|r| r.chars().collect()).collect();
        let mut neighbours = FnvHashMap::default();
        for (r, row) in grid.iter().enumerate() {
            for (c, &key) in row.iter().enumerate() {
                let mut near = Neighbours::new();
                for dr in [-1i32, 0, 1] {
                    let Some(other) = r
                        .checked_add_signed(dr as isize)
                        .and_then(|rr| grid.get(rr))
                    else {
                        continue;
                    };
                    for dc in [-1i32, 0, 1] {
                        if dr == 0 && dc == 0 {
                            continue;
                        }
                        if let Some(&n) = c
                            .checked_add_signed(dc as isize)
                            .and_then(|cc| other.get(cc))
                        {
                            near.push(n);
                        }
                    }
                }
                neighbours.insert(key, near);
            }
        }
        Self { neighbours }
    }

    /// Keys adjacent to `ch` on the keyboard, case preserved. Empty for
    /// characters that are not on the key grid.
    pub fn neighbours_of(&self, ch: char) -> Neighbours {
        let lower = ch.to_ascii_lowercase();
        let Some(near) = self.neighbours.get(&lower) else {
            return Neighbours::new();
        };
        if ch.is_ascii_uppercase() {
            near.iter().map(|n| n.to_ascii_uppercase()).collect()
        } else {
            near.clone()
        }
    }

    /// A random stand-in for `ch`. Whitespace maps to itself.
    pub fn substitute<R: Rng + ?Sized>(&self, ch: char, rng: &mut R) -> char {
        if ch.is_whitespace() {
            return ch;
        }
        let near = self.neighbours_of(ch);
        if let Some(&n) = near.choose(rng) {
            return n;
        }
        // Every ASCII letter and digit is on the grid, so this never echoes `ch`.
        FALLBACK[rng.gen_range(0..FALLBACK.len())] as char
    }
}
