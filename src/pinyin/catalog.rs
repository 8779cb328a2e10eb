//! The set of valid Pinyin syllables and the prefixes derived from it.

use ahash::AHashSet;

/// Every full syllable, grouped by initial.
///
/// Besides the standard Mandarin inventory this includes the syllables CEDICT
/// uses for erhua (`r`) and interjections (`m`, `n`, `ng`, `hm`, `hng`).
const FULL_SYLLABLES: &[&str] = &[
    // zero initial
    "a", "ai", "an", "ang", "ao", "e", "ei", "en", "eng", "er", "o", "ou",
    // b
    "ba", "bai", "ban", "bang", "bao", "bei", "ben", "beng", "bi", "bian", "biao", "bie", "bin",
    "bing", "bo", "bu",
    // p
    "pa", "pai", "pan", "pang", "pao", "pei", "pen", "peng", "pi", "pian", "piao", "pie", "pin",
    "ping", "po", "pou", "pu",
    // m
    "ma", "mai", "man", "mang", "mao", "me", "mei", "men", "meng", "mi", "mian", "miao", "mie",
    "min", "ming", "miu", "mo", "mou", "mu",
    // f
    "fa", "fan", "fang", "fei", "fen", "feng", "fo", "fou", "fu",
    // d
    "da", "dai", "dan", "dang", "dao", "de", "dei", "den", "deng", "di", "dia", "dian", "diao",
    "die", "ding", "diu", "dong", "dou", "du", "duan", "dui", "dun", "duo",
    // t
    "ta", "tai", "tan", "tang", "tao", "te", "tei", "teng", "ti", "tian", "tiao", "tie", "ting",
    "tong", "tou", "tu", "tuan", "tui", "tun", "tuo",
    // n
    "na", "nai", "nan", "nang", "nao", "ne", "nei", "nen", "neng", "ni", "nian", "niang", "niao",
    "nie", "nin", "ning", "niu", "nong", "nou", "nu", "nuan", "nun", "nuo", "nü", "nüe",
    // l
    "la", "lai", "lan", "lang", "lao", "le", "lei", "leng", "li", "lia", "lian", "liang", "liao",
    "lie", "lin", "ling", "liu", "lo", "long", "lou", "lu", "luan", "lun", "luo", "lü", "lüe",
    // g
    "ga", "gai", "gan", "gang", "gao", "ge", "gei", "gen", "geng", "gong", "gou", "gu", "gua",
    "guai", "guan", "guang", "gui", "gun", "guo",
    // k
    "ka", "kai", "kan", "kang", "kao", "ke", "kei", "ken", "keng", "kong", "kou", "ku", "kua",
    "kuai", "kuan", "kuang", "kui", "kun", "kuo",
    // h
    "ha", "hai", "han", "hang", "hao", "he", "hei", "hen", "heng", "hong", "hou", "hu", "hua",
    "huai", "huan", "huang", "hui", "hun", "huo",
    // j
    "ji", "jia", "jian", "jiang", "jiao", "jie", "jin", "jing", "jiong", "jiu", "ju", "juan",
    "jue", "jun",
    // q
    "qi", "qia", "qian", "qiang", "qiao", "qie", "qin", "qing", "qiong", "qiu", "qu", "quan",
    "que", "qun",
    // x
    "xi", "xia", "xian", "xiang", "xiao", "xie", "xin", "xing", "xiong", "xiu", "xu", "xuan",
    "xue", "xun",
    // zh
    "zha", "zhai", "zhan", "zhang", "zhao", "zhe", "zhei", "zhen", "zheng", "zhi", "zhong",
    "zhou", "zhu", "zhua", "zhuai", "zhuan", "zhuang", "zhui", "zhun", "zhuo",
    // ch
    "cha", "chai", "chan", "chang", "chao", "che", "chen", "cheng", "chi", "chong", "chou", "chu",
    "chua", "chuai", "chuan", "chuang", "chui", "chun", "chuo",
    // sh
    "sha", "shai", "shan", "shang", "shao", "she", "shei", "shen", "sheng", "shi", "shou", "shu",
    "shua", "shuai", "shuan", "shuang", "shui", "shun", "shuo",
    // r
    "ran", "rang", "rao", "re", "ren", "reng", "ri", "rong", "rou", "ru", "rua", "ruan", "rui",
    "run", "ruo",
    // z
    "za", "zai", "zan", "zang", "zao", "ze", "zei", "zen", "zeng", "zi", "zong", "zou", "zu",
    "zuan", "zui", "zun", "zuo",
    // c
    "ca", "cai", "can", "cang", "cao", "ce", "cen", "ceng", "ci", "cong", "cou", "cu", "cuan",
    "cui", "cun", "cuo",
    // s
    "sa", "sai", "san", "sang", "sao", "se", "sen", "seng", "si", "song", "sou", "su", "suan",
    "sui", "sun", "suo",
    // y
    "ya", "yan", "yang", "yao", "ye", "yi", "yin", "ying", "yo", "yong", "you", "yu", "yuan",
    "yue", "yun",
    // w
    "wa", "wai", "wan", "wang", "wei", "wen", "weng", "wo", "wu",
    // erhua and interjections
    "r", "m", "n", "ng", "hm", "hng",
];

/// Immutable syllable inventory with the lookups the tokenizer needs.
///
/// Partial syllables (`zh`, `gon`, `xio`, ...) are every proper prefix of a
/// full syllable that is not itself a full syllable.
#[derive(Debug, Clone)]
pub struct SyllableCatalog {
    full: AHashSet<&'static str>,
    partial: AHashSet<String>,
    prefixes: AHashSet<String>,
    max_len: usize,
}

impl Default for SyllableCatalog {
    fn default() -> Self {
        let full: AHashSet<&'static str> = FULL_SYLLABLES.iter().copied().collect();

        let mut prefixes = AHashSet::new();
        for syllable in FULL_SYLLABLES {
            for (end, _) in syllable.char_indices().skip(1) {
                prefixes.insert(syllable[..end].to_string());
            }
            prefixes.insert((*syllable).to_string());
        }

        let partial = prefixes
            .iter()
            .filter(|prefix| !full.contains(prefix.as_str()))
            .cloned()
            .collect();

        let max_len = FULL_SYLLABLES
            .iter()
            .map(|s| s.chars().count())
            .max()
            .unwrap_or(0);

        Self {
            full,
            partial,
            prefixes,
            max_len,
        }
    }
}

impl SyllableCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_full_syllable(&self, s: &str) -> bool {
        self.full.contains(s)
    }

    pub fn is_partial_syllable(&self, s: &str) -> bool {
        self.partial.contains(s)
    }

    /// True if some full syllable starts with `s` (a full syllable counts).
    pub fn has_syllable_with_prefix(&self, s: &str) -> bool {
        self.prefixes.contains(s)
    }

    /// Longest full syllable, in characters.
    pub fn max_syllable_len(&self) -> usize {
        self.max_len
    }

    /// All full syllables, in catalog order.
    pub fn full_syllables(&self) -> impl Iterator<Item = &'static str> {
        FULL_SYLLABLES.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use rstest::rstest;

    #[rstest]
    #[case("hao", true)]
    #[case("zhuang", true)]
    #[case("lüe", true)]
    #[case("r", true)]
    #[case("zh", false)]
    #[case("hello", false)]
    #[case("Hao", false)]
    fn test_full_membership(#[case] input: &str, #[case] expected: bool) {
        check!(SyllableCatalog::new().is_full_syllable(input) == expected);
    }

    #[rstest]
    #[case("zh", true)]
    #[case("ch", true)]
    #[case("gon", true)]
    #[case("xio", true)]
    #[case("b", true)]
    #[case("gong", false)] // full syllable
    #[case("n", false)] // full syllable
    #[case("i", false)] // no syllable starts with i
    #[case("zhx", false)]
    fn test_partial_membership(#[case] input: &str, #[case] expected: bool) {
        check!(SyllableCatalog::new().is_partial_syllable(input) == expected);
    }

    #[rstest]
    #[case("xia", true)]
    #[case("xian", true)]
    #[case("xiang", true)]
    #[case("xiangg", false)]
    #[case("l", true)]
    #[case("lü", true)]
    #[case("v", false)]
    fn test_prefix_lookup(#[case] input: &str, #[case] expected: bool) {
        check!(SyllableCatalog::new().has_syllable_with_prefix(input) == expected);
    }

    #[test]
    fn test_catalog_has_no_duplicates() {
        let catalog = SyllableCatalog::new();
        check!(catalog.full.len() == FULL_SYLLABLES.len());
        check!(catalog.max_syllable_len() == 6);
    }
}
