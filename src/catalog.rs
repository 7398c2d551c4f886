//! Static catalogue of correctable variables.
//!
//! Each entry ties a variable identifier to its data folder, the input
//! files its training script expects, the script itself and the folder
//! name used for its saved model.

use crate::error::CorrectionError;

/// One correctable ocean variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariableSpec {
    /// Identifier used on the command line.
    pub id: &'static str,
    /// Human-readable name.
    pub display_name: &'static str,
    /// Folder under the data directory holding the inputs.
    pub data_folder: &'static str,
    /// Input files, relative to the data folder, in check order.
    pub required_files: &'static [&'static str],
    /// Training script file name, relative to the scripts directory.
    pub script: &'static str,
    /// Name fragment of the persisted model (`unet_<folder>_model.h5`).
    pub model_folder: &'static str,
}

/// Sea surface salinity.
pub const SSS: VariableSpec = VariableSpec {
    id: "sss",
    display_name: "Sea Surface Salinity (SSS)",
    data_folder: "sss",
    required_files: &[
        "cmip6_sss_1958_2014_fill_diststen.mat",
        "oras5_sss_1958_2014_fill_diststen.mat",
        "oras5_historical_sss_1958_2020_mean.mat",
    ],
    script: "sss_unet_reorganised.py",
    model_folder: "sss",
};

/// Salinity averaged over the top 200m; stored as `so_200m` in the data tree.
pub const S200MAVG: VariableSpec = VariableSpec {
    id: "s200mavg",
    display_name: "Salinity at 200m depth (S200mavg)",
    data_folder: "so",
    required_files: &[
        "cmip6_so_200m_1958_2014_fill_diststen.mat",
        "oras5_so_200m_1958_2014_fill_diststen.mat",
        "oras5_historical_so_200m_1958_2020_mean.mat",
    ],
    script: "so_200m_unet_reorganised.py",
    model_folder: "so_200m",
};

/// All known variables, in listing order.
pub const VARIABLES: &[VariableSpec] = &[SSS, S200MAVG];

/// Looks up a variable by identifier.
///
/// # Errors
///
/// Returns [`CorrectionError::UnknownVariable`] for any id not in
/// [`VARIABLES`]. Matching is exact.
pub fn lookup(id: &str) -> Result<&'static VariableSpec, CorrectionError> {
    VARIABLES
        .iter()
        .find(|spec| spec.id == id)
        .ok_or_else(|| CorrectionError::UnknownVariable(id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_known_ids() {
        assert_eq!(lookup("sss").unwrap().data_folder, "sss");
        assert_eq!(lookup("s200mavg").unwrap().data_folder, "so");
    }

    #[test]
    fn lookup_rejects_unknown_and_case_variants() {
        assert!(matches!(lookup("sst"), Err(CorrectionError::UnknownVariable(id)) if id == "sst"));
        assert!(lookup("SSS").is_err());
        assert!(lookup("").is_err());
    }

    #[test]
    fn every_variable_has_required_files() {
        for spec in VARIABLES {
            assert!(!spec.required_files.is_empty(), "{} has no required files", spec.id);
        }
    }
}
