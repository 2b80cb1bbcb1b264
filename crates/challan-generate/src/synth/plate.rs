use rand::{Rng, RngCore};

#[derive(Debug, Clone, Copy)]
enum Slot {
    /// A run of letters whose length is picked uniformly from `counts`.
    Letters { counts: &'static [usize] },
    /// Integer in `low..=high`, zero-padded to a width picked uniformly from
    /// `widths` (0 = unpadded).
    Digits {
        low: u32,
        high: u32,
        widths: &'static [usize],
    },
}

const ONE: &[usize] = &[1];
const TWO: &[usize] = &[2];
const ONE_OR_TWO: &[usize] = &[1, 2];
const UNPADDED: &[usize] = &[0];
const WIDTH_2: &[usize] = &[2];
const WIDTH_3: &[usize] = &[3];
const WIDTH_4: &[usize] = &[4];
const WIDTH_3_OR_4: &[usize] = &[3, 4];

/// A registration layout: letter runs and numeric runs with their width
/// rules.
#[derive(Debug, Clone, Copy)]
pub struct PlateTemplate {
    pub pattern: &'static str,
    slots: &'static [Slot],
}

pub const PLATE_TEMPLATES: &[PlateTemplate] = &[
    PlateTemplate {
        pattern: "LDDLLDDD",
        slots: &[
            Slot::Letters { counts: ONE },
            Slot::Digits { low: 10, high: 99, widths: WIDTH_2 },
            Slot::Letters { counts: TWO },
            Slot::Digits { low: 0, high: 999, widths: WIDTH_3 },
        ],
    },
    PlateTemplate {
        pattern: "LDDLDDDD",
        slots: &[
            Slot::Letters { counts: ONE },
            Slot::Digits { low: 10, high: 99, widths: WIDTH_2 },
            Slot::Letters { counts: ONE },
            Slot::Digits { low: 0, high: 9999, widths: WIDTH_4 },
        ],
    },
    PlateTemplate {
        pattern: "LLDDLDDD",
        slots: &[
            Slot::Letters { counts: TWO },
            Slot::Digits { low: 0, high: 99, widths: WIDTH_2 },
            Slot::Letters { counts: ONE },
            Slot::Digits { low: 0, high: 999, widths: WIDTH_3 },
        ],
    },
    PlateTemplate {
        pattern: "LDDDDDD",
        slots: &[
            Slot::Letters { counts: ONE },
            Slot::Digits { low: 10, high: 99, widths: WIDTH_2 },
            Slot::Digits { low: 0, high: 9999, widths: WIDTH_4 },
        ],
    },
    // State letters, unpadded RTO, 1-2 series letters, serial zero-filled
    // to 3 or 4.
    PlateTemplate {
        pattern: "LL D{1,2} L{1,2} D{3,4}",
        slots: &[
            Slot::Letters { counts: TWO },
            Slot::Digits { low: 1, high: 99, widths: UNPADDED },
            Slot::Letters { counts: ONE_OR_TWO },
            Slot::Digits { low: 100, high: 9999, widths: WIDTH_3_OR_4 },
        ],
    },
];

impl PlateTemplate {
    pub fn fill(&self, rng: &mut dyn RngCore) -> String {
        let mut plate = String::with_capacity(10);
        for slot in self.slots {
            match *slot {
                Slot::Letters { counts } => {
                    let count = pick(counts, rng);
                    for _ in 0..count {
                        plate.push(random_letter(rng));
                    }
                }
                Slot::Digits { low, high, widths } => {
                    let value = rng.random_range(low..=high);
                    let width = pick(widths, rng);
                    plate.push_str(&format!("{value:0width$}"));
                }
            }
        }
        plate
    }
}

fn pick(options: &[usize], rng: &mut dyn RngCore) -> usize {
    match options {
        [only] => *only,
        _ => options[rng.random_range(0..options.len())],
    }
}

/// Picks a template uniformly and fills it.
pub fn random_plate(rng: &mut dyn RngCore) -> String {
    let template = &PLATE_TEMPLATES[rng.random_range(0..PLATE_TEMPLATES.len())];
    template.fill(rng)
}

pub(crate) fn random_letter(rng: &mut dyn RngCore) -> char {
    char::from(b'A' + rng.random_range(0..26u8))
}
