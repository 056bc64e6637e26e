//! Read-only spelling category knowledge base.

use crate::{CategoryId, GradeLevel, GradeTier};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One spelling category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryInfo {
    pub id: CategoryId,
    pub name: String,
    /// Rule statement shown to pupils
    pub rule: String,
    /// Visual imprinting action ("step 1")
    pub action: String,
    pub example: String,
    /// Typical phonetic misspelling of `example`
    pub misspelling: String,
    /// Mnemonic rhyme or rap, one line per verse line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rhyme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl CategoryInfo {
    /// First line of the rhyme, for compact printed hints.
    pub fn rhyme_opening(&self) -> Option<&str> {
        self.rhyme.as_deref().and_then(|r| r.lines().next())
    }
}

/// Category table plus the categories offered per tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCatalog {
    categories: BTreeMap<CategoryId, CategoryInfo>,
    tiers: BTreeMap<GradeTier, Vec<CategoryId>>,
}

// (id, name, rule, action, example, misspelling)
const BUILTIN: &[(CategoryId, &str, &str, &str, &str, &str)] = &[
    (1, "Hakwoord", "Ik schrijf het woord zoals ik het hoor.", "Zet streepjes tussen de letters (b-o-m).", "melk", "meluk"),
    (2, "Zingwoord", "Net als bij ding dong.", "Zet een rondje om 'ng' of 'nk'.", "jongen", "jonggen"),
    (3, "Luchtwoord", "Korte klank + cht met de ch van lucht.", "Onderstreep de korte klank en 'cht'.", "lucht", "lugt"),
    (4, "Plankwoord", "Daar mag geen 'g' tussen.", "Kleur de 'nk'.", "bank", "bangk"),
    (5, "Eer-oor-eur woord", "Ik schrijf eer, oor of eur.", "Onderstreep eer, oor of eur.", "beer", "bir"),
    (6, "Aai-ooi-oei woord", "Ik hoor de 'j', maar ik schrijf de 'i'.", "Zet een rondje om de 'i' op het eind.", "haai", "haaj"),
    (7, "Eeuw-ieuw woord", "Ik denk aan de 'u'.", "Zet een rondje om de 'u'.", "nieuwe", "niewe"),
    (8, "Langermaakwoord", "Ik hoor een 't' aan het eind, dus langer maken.", "Maak het woord langer (hond, honden).", "hond", "hont"),
    (9, "Voorvoegsel", "Ik hoor de 'u', maar ik schrijf de 'e' (be-, ge-, ver-).", "Kleur het voorvoegsel.", "gebak", "gubak"),
    (10, "Klankgroepenwoord", "Korte klank: dubbele medeklinker. Lange klank: een stukje weg.", "Hak het woord in klankgroepen.", "bakker", "baker"),
    (11, "Verkleinwoord", "Grondwoord + je, tje of pje.", "Onderstreep het grondwoord.", "boompje", "boompie"),
    (12, "Achtervoegsel", "Ik hoor '-ug' of '-luk', maar ik schrijf '-ig' of '-lijk'.", "Kleur het achtervoegsel.", "jarig", "jarug"),
    (13, "Kilowoord", "Ik hoor de 'ie', maar ik schrijf de 'i'.", "Zet een rondje om de 'i'.", "piloot", "pieloot"),
    (14, "Komma-s meervoud", "Meervoud en lange klank aan het eind: komma-s.", "Omcirkel de komma-s.", "auto's", "autos"),
    (15, "Centwoord", "Ik hoor de 's', maar ik schrijf de 'c'.", "Onderstreep de 'c'.", "citroen", "sitroen"),
    (16, "Komma-s diverse", "Komma-s bij bezit of afkortingen.", "Omcirkel de komma-s.", "Anna's", "Annas"),
    (17, "Politiewoord", "Ik hoor 'tsie', maar ik schrijf 'tie'.", "Zet een rondje om 'tie'.", "politie", "politsie"),
    (18, "Colawoord", "Ik hoor de 'k', maar ik schrijf de 'c'.", "Onderstreep de 'c'.", "cola", "kola"),
    (19, "Tropisch woord", "Ik hoor 'ies', maar ik schrijf 'isch'.", "Onderstreep 'isch'.", "tropisch", "tropies"),
    (20, "Taxiwoord", "Ik hoor 'ks', maar ik schrijf de 'x'.", "Zet een rondje om de 'x'.", "taxi", "taksi"),
    (21, "Chefwoord", "Ik hoor 'sj', maar ik schrijf 'ch'.", "Onderstreep 'ch'.", "chef", "sjef"),
    (22, "Theewoord", "Ik hoor 't', maar ik schrijf 'th'.", "Omcirkel 'th'.", "thee", "tee"),
    (23, "Caféwoord", "Leenwoord met een streepje op de 'e'.", "Zet een rondje om het streepje.", "café", "cafe"),
    (24, "Cadeauwoord", "Ik hoor 'oo', maar ik schrijf 'eau'.", "Onderstreep 'eau'.", "cadeau", "kado"),
    (25, "Routewoord", "Ik hoor 'oe', maar ik schrijf 'ou'.", "Onderstreep 'ou'.", "route", "roete"),
    (26, "Garagewoord", "Ik hoor 'zj', maar ik schrijf 'g'.", "Zet een rondje om de 'g'.", "garage", "garazje"),
    (27, "Lollywoord", "Ik hoor 'ie', maar ik schrijf 'y'.", "Zet een rondje om de 'y'.", "lolly", "lollie"),
    (28, "Tremawoord", "Twee puntjes om klinkerbotsing te voorkomen.", "Zet een rondje om de puntjes.", "poëzie", "poezie"),
    (29, "Militairwoord", "Ik hoor 'èr', maar ik schrijf 'air'.", "Onderstreep 'air'.", "militair", "militèr"),
    (30, "Koppelteken", "Samenstelling met streepje.", "Zet een rondje om het streepje.", "na-apen", "naapen"),
    (31, "Trottoirwoord", "Ik hoor 'waar', ik schrijf 'oir'.", "Onderstreep 'oir'.", "trottoir", "trottewaar"),
    (32, "Tussen-e of -en", "Meervoud van het eerste deel is -en? Dan tussen-n.", "Onderstreep de tussen-n.", "pannenkoek", "pannekoek"),
    (33, "Apostrofwoord", "'s Morgens of meervoud op 's.", "Zet een rondje om de komma-s.", "baby's", "babys"),
    (34, "Latijns voorvoegsel", "Ad-, ab-, ob-, sub-.", "Onderstreep het voorvoegsel.", "adviseren", "atviseren"),
    (35, "Samenstelling", "Twee woorden aan elkaar.", "Zet een streepje tussen de twee woorden.", "voetbal", "voet bal"),
    (36, "Ei-plaat", "Weetwoord: staat op de ei-plaat.", "Onderstreep de 'ei'.", "trein", "trijn"),
    (37, "Au-plaat", "Weetwoord: staat op de au-plaat.", "Onderstreep de 'au'.", "pauw", "pouw"),
];

// (id, rhyme, extended explanation)
const MNEMONICS: &[(CategoryId, Option<&str>, Option<&str>)] = &[
    (1, None, Some("Ik schrijf het woord zoals ik het hoor. b-o-s bos, d-a-k dak. Speciaal hakwoord: Daar mag geen 'u' tussen (melk, werk).")),
    (3, Some("Sippe Simon heeft weer pech.\nAch, het is zo’n lekker joch.\nDraait zich om en, och, niet huilen.\nSippe Simon, lach nou toch.\nSimon roept na eerst wat kuchen\n“Kijk dan, ik ben goochelaar!”\nMaar helaas het wordt een chaos,\nzijn techniek is toch niet klaar.\nEindelijk, Simon staat te juichen,\nheel zijn lichaam jubelt mee.\nHij roept: “kachel!”, er klinkt: “kachel”!\nDoor de echo zijn het er twee."), None),
    (5, None, Some("eer-woord: ik schrijf ee (weer, keer). oor-woord: ik schrijf oo (door, koor). eur-woord: ik schrijf eu (deur, sleur). eel-woord: ik schrijf ee (veel, steel).")),
    (6, None, Some("aai: haai, maai. ooi: strooi, mooi. oei: loei, roei.")),
    (7, None, Some("eeuw: sneeuw, geeuw. ieuw: nieuw, kieuw.")),
    (8, None, Some("Ik hoor een t aan het eind, dus langer maken. Ik hoor of ik d of t moet schrijven (hond-honden). Ook Langermaakwoord (2): Eind-b rijtje, dus langer maken. Ik hoor dat ik een b moet schrijven (krab-krabben).")),
    (9, None, Some("geluk, genoeg, verdwalen en bewaker.")),
    (10, None, Some("1. Korte klank (a,e,i,o,u) -> dubbele medeklinker (bakker). 2. Lange klank (aa,ee,oo,uu) -> ik gum een stukje weg (bomen). 3. Twee-tekenklank (ie,eu,au) -> schrijf zoals je hoort. 4. Medeklinker -> schrijf zoals je hoort.")),
    (11, None, Some("Grondwoord dan –je, -tje, -pje erachter. Verkleinwoord met -etje: ik hoor twee keer u maar schrijf e. Verkleinwoord met: -aatje, -ootje, -uutje (woord + aatje). Let op: Eerst de regels van het grondwoord toepassen!")),
    (14, None, Some("Eerst de komma, dan de s ('s avonds). Meervoud: Meervoud en lange klank aan het eind: komma s behalve bij ee (kassa's).")),
    (21, None, Some("chef, chocola")),
    (22, None, Some("thee, theater")),
    (24, None, Some("cadeau, bureau")),
    (26, None, Some("garage, bagage")),
    (27, None, Some("Ik schrijf de Griekse y. lolly, baby")),
    (28, None, Some("Puntjes op de klinker (vegetariër, financiële). Trema meervoud: Bij woorden met ee schrijf ik ën erachter (ideeën). Bij woorden met ie schrijf ik ën erachter (knieën). Behalve bij bacteriën, koloniën, oliën.")),
    (30, None, Some("1. Klinkerbotsing: 1e woord eindigt en 2e woord begint met een klinker (zee-egel). 2. Aardrijkskundige namen (Noord-Brabant). 3. Afkortingen (tv-gids). 4. Met ex, oud en bij klaar-over.")),
    (32, None, Some("De tussen -e komt bij: bijvoeglijk naamwoord (machteloos), eerste woord geen zelfstandig naamwoord (verrekijker), eerste woord geen meervoud of meervoud op -es (secondewijzer), eerste woord is zon/maan/koningin.")),
    (34, None, Some("abces, advent, obsessie, substantie")),
    (35, None, Some("1e woord: (woord+categorie+regel) + 2e woord: (woord+categorie+regel).")),
    (36, Some("EI RAP:\nOnze geit staat in de wei\nmet haar poten in de klei\nen eist een teil met worteltjes en lekker verse prei\nUit de eik valt soms in mei\nuit een heel klein nest een ei\nHet valt steil naar beneden op een zachte rode sprei\nOnze reis gaat met de trein\nHet station is aan het plein,\nmaar de trein moet even wachten op het groene sein.\nHein die zei, ’t is echt een feit,\nMaar, als de knecht de keuken dweilt, heel graag een stukje zeilt.\nWeet je wat Hein ook nog zei?\nEr loopt een engerd op de hei\nen die dreigt zowaar te gooien met een grote kei!"), None),
    (37, Some("AU RAP:\nDie prachtige pauw\nheeft zo’n last van zijn klauw.\nWat zielig, straks valt de stakker nog flauw.\nLaura eet graag rauw,\ndus niet warm, liever lauw\nmet saus gemaakt van druppeltjes dauw.\nPauls jas is niet blauw,\nmaar een tikkeltje grauw,\nmaar als je dat opmerkt dan krijg je een snauw.\nAls ik vettig kauw\nwordt mijn broek veel te nauw\nen dat doet au! Dus stop ik maar gauw."), None),
];

static BUILTIN_CATALOG: Lazy<CategoryCatalog> = Lazy::new(|| {
    let categories = BUILTIN
        .iter()
        .map(|(id, name, rule, action, example, misspelling)| {
            let (rhyme, explanation) = MNEMONICS
                .iter()
                .find(|(m, _, _)| m == id)
                .map(|(_, rhyme, explanation)| (*rhyme, *explanation))
                .unwrap_or((None, None));
            (
                *id,
                CategoryInfo {
                    id: *id,
                    name: name.to_string(),
                    rule: rule.to_string(),
                    action: action.to_string(),
                    example: example.to_string(),
                    misspelling: misspelling.to_string(),
                    rhyme: rhyme.map(str::to_string),
                    explanation: explanation.map(str::to_string),
                },
            )
        })
        .collect();

    let with_extras = |upper: CategoryId| -> Vec<CategoryId> {
        let mut ids: Vec<CategoryId> = (1..=upper).collect();
        for extra in [35, 36, 37] {
            if !ids.contains(&extra) {
                ids.push(extra);
            }
        }
        ids
    };

    let mut tiers = BTreeMap::new();
    tiers.insert(GradeTier::Lower, with_extras(12));
    tiers.insert(GradeTier::Middle5, with_extras(17));
    tiers.insert(GradeTier::Middle6, with_extras(28));
    tiers.insert(GradeTier::Upper, (1..=37).collect());

    CategoryCatalog { categories, tiers }
});

impl CategoryCatalog {
    /// The built-in 37-category table.
    pub fn builtin() -> &'static CategoryCatalog {
        &BUILTIN_CATALOG
    }

    /// Build a catalog from an explicit table.
    pub fn new(
        categories: impl IntoIterator<Item = CategoryInfo>,
        tiers: BTreeMap<GradeTier, Vec<CategoryId>>,
    ) -> Self {
        Self {
            categories: categories.into_iter().map(|c| (c.id, c)).collect(),
            tiers,
        }
    }

    pub fn get(&self, id: CategoryId) -> Option<&CategoryInfo> {
        self.categories.get(&id)
    }

    pub fn contains(&self, id: CategoryId) -> bool {
        self.categories.contains_key(&id)
    }

    /// Display name, or a generic label for ids not in the table.
    pub fn name(&self, id: CategoryId) -> String {
        self.get(id)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| format!("Category {}", id))
    }

    /// Categories offered for a grade, in id order.
    pub fn allowed_for(&self, grade: GradeLevel) -> &[CategoryId] {
        self.tiers
            .get(&grade.tier())
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_allowed(&self, grade: GradeLevel, id: CategoryId) -> bool {
        self.allowed_for(grade).contains(&id)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategoryInfo> {
        self.categories.values()
    }
}
