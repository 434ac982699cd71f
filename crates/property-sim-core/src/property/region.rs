use serde::{Deserialize, Serialize};

/// Okinawa prefecture market areas used to pick a land cap rate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    Naha,
    Chunanbu,
    Hokubu,
    #[default]
    Unclassified,
}

const CHUNANBU_MUNICIPALITIES: &[&str] = &[
    "浦添", "宜野湾", "沖縄市", "うるま", "糸満", "豊見城", "南城", "西原", "中城", "北中城",
    "北谷", "嘉手納", "読谷", "与那原", "八重瀬",
];

const HOKUBU_MUNICIPALITIES: &[&str] = &[
    "名護", "国頭", "大宜味", "東村", "今帰仁", "本部", "恩納", "宜野座", "金武", "伊江",
    "伊平屋", "伊是名", "久米島", "渡名喜", "粟国", "渡嘉敷", "座間味", "南大東", "北大東",
    "宮古島", "多良間", "石垣", "竹富", "与那国",
];

impl Region {
    /// Parse a region code as posted by the form. Unknown codes are unclassified.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Naha" => Region::Naha,
            "Chunanbu" => Region::Chunanbu,
            "Hokubu" => Region::Hokubu,
            _ => Region::Unclassified,
        }
    }

    /// Classify an address by the municipality it mentions. Naha is checked
    /// first, then the central/southern and northern municipality lists.
    pub fn infer_from_address(address: &str) -> Self {
        if address.contains("那覇") {
            Region::Naha
        } else if CHUNANBU_MUNICIPALITIES.iter().any(|m| address.contains(m)) {
            Region::Chunanbu
        } else if HOKUBU_MUNICIPALITIES.iter().any(|m| address.contains(m)) {
            Region::Hokubu
        } else {
            Region::Unclassified
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        assert_eq!(Region::from_name("Naha"), Region::Naha);
        assert_eq!(Region::from_name("Hokubu"), Region::Hokubu);
        assert_eq!(Region::from_name("Tokyo"), Region::Unclassified);
    }

    #[test]
    fn test_infer_naha() {
        assert_eq!(Region::infer_from_address("那覇市おもろまち4丁目"), Region::Naha);
    }

    #[test]
    fn test_infer_chunanbu() {
        assert_eq!(Region::infer_from_address("沖縄市泡瀬4丁目"), Region::Chunanbu);
        assert_eq!(Region::infer_from_address("中頭郡北谷町美浜"), Region::Chunanbu);
    }

    #[test]
    fn test_infer_hokubu() {
        assert_eq!(Region::infer_from_address("名護市宮里"), Region::Hokubu);
        assert_eq!(Region::infer_from_address("石垣市美崎町"), Region::Hokubu);
    }

    #[test]
    fn test_infer_unknown() {
        assert_eq!(Region::infer_from_address(""), Region::Unclassified);
        assert_eq!(Region::infer_from_address("東京都千代田区"), Region::Unclassified);
    }
}
