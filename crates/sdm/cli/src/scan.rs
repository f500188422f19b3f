//! Extraction of mirrored SDM parameters from a scanned URL

use url::Url;

use crate::config::ParamNames;

/// Raw hex fields mirrored by the tag into its URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SunParams {
    pub(crate) uid: String,
    pub(crate) ctr: String,
    pub(crate) cmac: String,
}

impl SunParams {
    /// Pull the three parameters out of `url`'s query string
    ///
    /// Returns `None` when any of them is absent or empty. Repeated parameters
    /// resolve to their first occurrence.
    pub(crate) fn from_url(url: &Url, names: &ParamNames) -> Option<Self> {
        let find = |name: &str| {
            url.query_pairs()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.into_owned())
                .filter(|value| !value.is_empty())
        };

        Some(Self {
            uid: find(&names.uid)?,
            ctr: find(&names.ctr)?,
            cmac: find(&names.cmac)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(url: &str) -> Option<SunParams> {
        SunParams::from_url(&Url::parse(url).unwrap(), &ParamNames::default())
    }

    #[test]
    fn test_extracts_parameters() {
        let params =
            parse("https://sdm.example/tag?uid=041E3C8A2D6B80&ctr=000006&cmac=4B00064004B0B3D3")
                .unwrap();
        assert_eq!(params.uid, "041E3C8A2D6B80");
        assert_eq!(params.ctr, "000006");
        assert_eq!(params.cmac, "4B00064004B0B3D3");
    }

    #[test]
    fn test_missing_or_empty_parameter() {
        assert!(parse("https://sdm.example/tag?uid=041E3C8A2D6B80&ctr=000006").is_none());
        assert!(parse("https://sdm.example/tag?uid=041E3C8A2D6B80&ctr=&cmac=00").is_none());
        assert!(parse("https://sdm.example/tag").is_none());
    }

    #[test]
    fn test_custom_names() {
        let names = ParamNames {
            uid: "u".to_string(),
            ctr: "c".to_string(),
            cmac: "m".to_string(),
        };
        let url = Url::parse("https://sdm.example/?m=4B00064004B0B3D3&u=041E3C8A2D6B80&c=000006")
            .unwrap();
        let params = SunParams::from_url(&url, &names).unwrap();
        assert_eq!(params.cmac, "4B00064004B0B3D3");
    }
}
