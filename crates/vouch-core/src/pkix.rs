use crate::types::{Certificate, Crl};

// ---------------------------------------------------------------------------
// PkixValidationInfo — trust anchors, CRLs and the depth bound handed to an
// external PKIX path validator. Pure data: immutable once constructed, the
// validation algorithm itself lives outside this core.
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PkixValidationInfo {
    verification_depth: u32,
    trust_anchors: Vec<Certificate>,
    crls: Vec<Crl>,
}

impl PkixValidationInfo {
    /// `verification_depth` of 0 means no explicit bound from this data;
    /// the validator applies its own default.
    pub fn new(verification_depth: u32, trust_anchors: Vec<Certificate>, crls: Vec<Crl>) -> Self {
        Self {
            verification_depth,
            trust_anchors,
            crls,
        }
    }

    pub fn verification_depth(&self) -> u32 {
        self.verification_depth
    }

    pub fn trust_anchors(&self) -> &[Certificate] {
        &self.trust_anchors
    }

    pub fn crls(&self) -> &[Crl] {
        &self.crls
    }
}
