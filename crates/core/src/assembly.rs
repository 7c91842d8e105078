//! Reference genome assemblies: chromosome sizes and the absolute
//! coordinate system obtained by concatenating chromosomes in order.

use serde::{Deserialize, Serialize};

use crate::spec::GenomicDomain;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Assembly {
    #[default]
    Hg38,
    Hg19,
    Mm10,
    /// No reference: coordinates are used as given and genomic domains
    /// must be explicit.
    Unknown,
}

const HG38: &[(&str, u64)] = &[
    ("chr1", 248_956_422),
    ("chr2", 242_193_529),
    ("chr3", 198_295_559),
    ("chr4", 190_214_555),
    ("chr5", 181_538_259),
    ("chr6", 170_805_979),
    ("chr7", 159_345_973),
    ("chr8", 145_138_636),
    ("chr9", 138_394_717),
    ("chr10", 133_797_422),
    ("chr11", 135_086_622),
    ("chr12", 133_275_309),
    ("chr13", 114_364_328),
    ("chr14", 107_043_718),
    ("chr15", 101_991_189),
    ("chr16", 90_338_345),
    ("chr17", 83_257_441),
    ("chr18", 80_373_285),
    ("chr19", 58_617_616),
    ("chr20", 64_444_167),
    ("chr21", 46_709_983),
    ("chr22", 50_818_468),
    ("chrX", 156_040_895),
    ("chrY", 57_227_415),
    ("chrM", 16_569),
];

const HG19: &[(&str, u64)] = &[
    ("chr1", 249_250_621),
    ("chr2", 243_199_373),
    ("chr3", 198_022_430),
    ("chr4", 191_154_276),
    ("chr5", 180_915_260),
    ("chr6", 171_115_067),
    ("chr7", 159_138_663),
    ("chr8", 146_364_022),
    ("chr9", 141_213_431),
    ("chr10", 135_534_747),
    ("chr11", 135_006_516),
    ("chr12", 133_851_895),
    ("chr13", 115_169_878),
    ("chr14", 107_349_540),
    ("chr15", 102_531_392),
    ("chr16", 90_354_753),
    ("chr17", 81_195_210),
    ("chr18", 78_077_248),
    ("chr19", 59_128_983),
    ("chr20", 63_025_520),
    ("chr21", 48_129_895),
    ("chr22", 51_304_566),
    ("chrX", 155_270_560),
    ("chrY", 59_373_566),
    ("chrM", 16_571),
];

const MM10: &[(&str, u64)] = &[
    ("chr1", 195_471_971),
    ("chr2", 182_113_224),
    ("chr3", 160_039_680),
    ("chr4", 156_508_116),
    ("chr5", 151_834_684),
    ("chr6", 149_736_546),
    ("chr7", 145_441_459),
    ("chr8", 129_401_213),
    ("chr9", 124_595_110),
    ("chr10", 130_694_993),
    ("chr11", 122_082_543),
    ("chr12", 120_129_022),
    ("chr13", 120_421_639),
    ("chr14", 124_902_244),
    ("chr15", 104_043_685),
    ("chr16", 98_207_768),
    ("chr17", 94_987_271),
    ("chr18", 90_702_639),
    ("chr19", 61_431_566),
    ("chrX", 171_031_299),
    ("chrY", 91_744_698),
    ("chrM", 16_299),
];

impl Assembly {
    /// Chromosomes with their sizes, in concatenation order.
    pub fn chromosomes(self) -> &'static [(&'static str, u64)] {
        match self {
            Self::Hg38 => HG38,
            Self::Hg19 => HG19,
            Self::Mm10 => MM10,
            Self::Unknown => &[],
        }
    }

    pub fn is_known(self) -> bool {
        !self.chromosomes().is_empty()
    }

    /// Length of the whole concatenated genome.
    pub fn total_size(self) -> f64 {
        self.chromosomes().iter().map(|(_, size)| *size as f64).sum()
    }

    /// Absolute position of the first base of `chromosome`. Accepts both
    /// `chr1` and `1` spellings.
    pub fn chromosome_offset(self, chromosome: &str) -> Option<f64> {
        let mut offset = 0.0;
        for (name, size) in self.chromosomes() {
            if same_chromosome(name, chromosome) {
                return Some(offset);
            }
            offset += *size as f64;
        }
        None
    }

    pub fn chromosome_size(self, chromosome: &str) -> Option<f64> {
        self.chromosomes()
            .iter()
            .find(|(name, _)| same_chromosome(name, chromosome))
            .map(|(_, size)| *size as f64)
    }

    /// Absolute interval covered by a genomic domain literal.
    pub fn resolve_domain(self, domain: &GenomicDomain) -> Option<[f64; 2]> {
        let offset = self.chromosome_offset(&domain.chromosome)?;
        match domain.interval {
            Some([start, end]) => Some([offset + start, offset + end]),
            None => {
                let size = self.chromosome_size(&domain.chromosome)?;
                Some([offset, offset + size])
            }
        }
    }

    /// Chromosome containing an absolute position, with the position
    /// relative to that chromosome.
    pub fn locate(self, absolute: f64) -> Option<(&'static str, f64)> {
        let mut offset = 0.0;
        for (name, size) in self.chromosomes() {
            let size = *size as f64;
            if absolute < offset + size {
                return Some((name, absolute - offset));
            }
            offset += size;
        }
        None
    }
}

fn same_chromosome(canonical: &str, query: &str) -> bool {
    let bare = canonical.trim_start_matches("chr");
    query == canonical || query == bare || query.eq_ignore_ascii_case(canonical)
}
