// ---------------------------------------------------------------------------
// ChannelRole – what a member of a sample group is used for
// ---------------------------------------------------------------------------

/// Role of one channel image inside a sample group.
///
/// Roles are recognised by the excitation wavelength at the end of the file
/// stem, e.g. `sample0001_405.TIF` is the nuclear stain reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChannelRole {
    /// Nuclear stain (DAPI), the normalization denominator.
    Reference,
    SignalA,
    SignalB,
}

impl ChannelRole {
    pub const ALL: [ChannelRole; 3] = [
        ChannelRole::Reference,
        ChannelRole::SignalA,
        ChannelRole::SignalB,
    ];

    /// Wavelength marker expected at the end of the file stem.
    pub fn marker(self) -> &'static str {
        match self {
            ChannelRole::Reference => "405",
            ChannelRole::SignalA => "488",
            ChannelRole::SignalB => "561",
        }
    }

    /// Position of this role in a group under the legacy positional layout
    /// (index 0 unused).
    pub fn legacy_index(self) -> usize {
        match self {
            ChannelRole::Reference => 1,
            ChannelRole::SignalA => 2,
            ChannelRole::SignalB => 3,
        }
    }

    /// Recognise a role from a filename, ignoring the extension.
    pub fn from_filename(name: &str) -> Option<Self> {
        let stem = match name.rfind('.') {
            Some(dot) if dot > 0 => &name[..dot],
            _ => name,
        };
        Self::ALL.into_iter().find(|role| stem.ends_with(role.marker()))
    }
}

// ---------------------------------------------------------------------------
// SampleGroup – all channel files of one imaged sample
// ---------------------------------------------------------------------------

/// Filenames sharing a sample key, in the order they were discovered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleGroup {
    pub key: String,
    pub members: Vec<String>,
}

/// Filenames chosen for the three analyzed roles of a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleAssignment<'a> {
    pub reference: &'a str,
    pub signal_a: &'a str,
    pub signal_b: &'a str,
    /// `true` when wavelength markers were ambiguous or missing and the
    /// positional layout was used instead.
    pub positional: bool,
}

impl SampleGroup {
    pub fn new(key: impl Into<String>) -> Self {
        SampleGroup {
            key: key.into(),
            members: Vec::new(),
        }
    }

    /// Number of member files.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Pick the reference and signal files of this group.
    ///
    /// Each role is matched by its wavelength marker. When any role has zero
    /// or several candidates, the members are sorted and the positional layout
    /// (index 1 reference, 2 signal A, 3 signal B) is used. Returns `None` if
    /// the group is too small for the positional layout.
    pub fn assign_roles(&self) -> Option<RoleAssignment<'_>> {
        let by_marker = |role: ChannelRole| {
            let mut hits = self
                .members
                .iter()
                .filter(|m| ChannelRole::from_filename(m) == Some(role));
            match (hits.next(), hits.next()) {
                (Some(only), None) => Some(only.as_str()),
                _ => None,
            }
        };

        if let (Some(reference), Some(signal_a), Some(signal_b)) = (
            by_marker(ChannelRole::Reference),
            by_marker(ChannelRole::SignalA),
            by_marker(ChannelRole::SignalB),
        ) {
            return Some(RoleAssignment {
                reference,
                signal_a,
                signal_b,
                positional: false,
            });
        }

        let mut sorted: Vec<&str> = self.members.iter().map(String::as_str).collect();
        sorted.sort_unstable();
        let at = |role: ChannelRole| sorted.get(role.legacy_index()).copied();
        Some(RoleAssignment {
            reference: at(ChannelRole::Reference)?,
            signal_a: at(ChannelRole::SignalA)?,
            signal_b: at(ChannelRole::SignalB)?,
            positional: true,
        })
    }
}

// ---------------------------------------------------------------------------
// ChannelImage – one decoded grayscale channel
// ---------------------------------------------------------------------------

/// An 8-bit single-channel image, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelImage {
    pub width: u32,
    pub height: u32,
    /// `width * height` samples.
    pub pixels: Vec<u8>,
}

impl ChannelImage {
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Arithmetic mean over all pixels. Empty images have a mean of 0.
    pub fn mean(&self) -> f64 {
        if self.pixels.is_empty() {
            return 0.0;
        }
        let sum: u64 = self.pixels.iter().map(|&p| p as u64).sum();
        sum as f64 / self.pixels.len() as f64
    }
}

// ---------------------------------------------------------------------------
// IntensityRecord / AnalysisReport – analyzer output
// ---------------------------------------------------------------------------

/// Mean intensities of one analyzed sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleIntensity {
    pub raw_a: f64,
    pub raw_b: f64,
    pub normalized_a: f64,
    pub normalized_b: f64,
}

/// Four parallel sequences, one entry per analyzed sample.
///
/// Fields are private so entries can only be appended through [`push`],
/// which keeps all four sequences the same length.
///
/// [`push`]: IntensityRecord::push
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntensityRecord {
    raw_a: Vec<f64>,
    raw_b: Vec<f64>,
    normalized_a: Vec<f64>,
    normalized_b: Vec<f64>,
}

impl IntensityRecord {
    pub fn push(&mut self, sample: SampleIntensity) {
        self.raw_a.push(sample.raw_a);
        self.raw_b.push(sample.raw_b);
        self.normalized_a.push(sample.normalized_a);
        self.normalized_b.push(sample.normalized_b);
    }

    pub fn len(&self) -> usize {
        self.raw_a.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw_a.is_empty()
    }

    pub fn raw_a(&self) -> &[f64] {
        &self.raw_a
    }

    pub fn raw_b(&self) -> &[f64] {
        &self.raw_b
    }

    pub fn normalized_a(&self) -> &[f64] {
        &self.normalized_a
    }

    pub fn normalized_b(&self) -> &[f64] {
        &self.normalized_b
    }
}

/// Result of analyzing a folder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisReport {
    pub record: IntensityRecord,
    /// Keys of the analyzed groups, aligned with `record`.
    pub analyzed: Vec<String>,
    /// Keys and sizes of groups skipped for having the wrong channel count.
    pub skipped: Vec<(String, usize)>,
}
