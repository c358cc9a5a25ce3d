use serde::Serialize;

struct LasaPair {
    first: &'static str,
    second: &'static str,
    /// Tall-man spellings, same order as the names.
    tall_man: (&'static str, &'static str),
}

/// Look-alike/sound-alike pairs commonly confused in school clinics.
const LASA_PAIRS: &[LasaPair] = &[
    LasaPair {
        first: "hydroxyzine",
        second: "hydralazine",
        tall_man: ("hydrOXYzine", "hydrALAZINE"),
    },
    LasaPair {
        first: "cetirizine",
        second: "sertraline",
        tall_man: ("cetirizine", "sertraline"),
    },
    LasaPair {
        first: "clonidine",
        second: "klonopin",
        tall_man: ("cloNIDine", "KlonoPIN"),
    },
    LasaPair {
        first: "clonazepam",
        second: "clonidine",
        tall_man: ("clonazePAM", "cloNIDine"),
    },
    LasaPair {
        first: "guanfacine",
        second: "guaifenesin",
        tall_man: ("guanFACINE", "guaiFENesin"),
    },
    LasaPair {
        first: "methylphenidate",
        second: "methadone",
        tall_man: ("methylphenidate", "methadone"),
    },
    LasaPair {
        first: "adderall",
        second: "inderal",
        tall_man: ("Adderall", "Inderal"),
    },
    LasaPair {
        first: "prednisone",
        second: "prednisolone",
        tall_man: ("predniSONE", "prednisoLONE"),
    },
    LasaPair {
        first: "lamotrigine",
        second: "levetiracetam",
        tall_man: ("lamoTRIgine", "levETIRAcetam"),
    },
    LasaPair {
        first: "risperidone",
        second: "ropinirole",
        tall_man: ("risperiDONE", "rOPINIRole"),
    },
    LasaPair {
        first: "oxcarbazepine",
        second: "carbamazepine",
        tall_man: ("OXcarbazepine", "carBAMazepine"),
    },
    LasaPair {
        first: "epinephrine",
        second: "ephedrine",
        tall_man: ("EPINEPHrine", "ePHEDrine"),
    },
    LasaPair {
        first: "bupropion",
        second: "buspirone",
        tall_man: ("buPROPion", "busPIRone"),
    },
    LasaPair {
        first: "zyrtec",
        second: "zantac",
        tall_man: ("ZyrTEC", "ZanTAC"),
    },
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LasaWarning {
    pub medication: String,
    pub confused_with: String,
    pub tall_man: String,
    pub confused_with_tall_man: String,
}

/// Every LASA pair `name` belongs to (case-insensitive, either side).
pub fn lasa_warnings(name: &str) -> Vec<LasaWarning> {
    let needle = name.trim().to_lowercase();
    if needle.is_empty() {
        return vec![];
    }

    LASA_PAIRS
        .iter()
        .filter_map(|pair| {
            if pair.first == needle {
                Some(LasaWarning {
                    medication: pair.first.to_string(),
                    confused_with: pair.second.to_string(),
                    tall_man: pair.tall_man.0.to_string(),
                    confused_with_tall_man: pair.tall_man.1.to_string(),
                })
            } else if pair.second == needle {
                Some(LasaWarning {
                    medication: pair.second.to_string(),
                    confused_with: pair.first.to_string(),
                    tall_man: pair.tall_man.1.to_string(),
                    confused_with_tall_man: pair.tall_man.0.to_string(),
                })
            } else {
                None
            }
        })
        .collect()
}
