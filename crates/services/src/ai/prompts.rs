//! Prompt text sent to the generative service.

use aid_core::model::{Difficulty, Topic};

/// Longest document excerpt sent for question extraction, in characters.
pub const IMPORT_CONTENT_LIMIT: usize = 25_000;

pub const CHAT_SYSTEM_INSTRUCTION: &str = "Sen yardımsever bir ilk yardım asistanısın. \
Kısa, net ve anlaşılır cevaplar ver. Türkiye'deki 112 ve Sağlık Bakanlığı ilk yardım \
protokollerine uy. Tıbbi teşhis koyma; acil durumlarda her zaman 112'nin aranmasını hatırlat.";

#[must_use]
pub fn question_prompt(topic: Topic, difficulty: Difficulty) -> String {
    format!(
        "Sen Türkiye'de ilk yardım eğitmeni sertifika sınavına öğrenci hazırlayan profesyonel bir eğitmensin.\n\
         Konu: \"{topic}\"\n\
         Zorluk: {difficulty}\n\
         Sağlık Bakanlığı İlk Yardım Yönetmeliği'ne uygun, sınav kalitesinde tek bir çoktan seçmeli soru hazırla.\n\
         Kurallar:\n\
         1. Soru profesyonel bir Türkçe ile yazılmalı.\n\
         2. Tam olarak 4 seçenek olmalı ve seçenekler birbirine yakın, çeldirici olmalı.\n\
         3. Doğru cevap Türkiye'deki güncel ilk yardım protokollerine uymalı.\n\
         4. Açıklama doğru cevabın nedenini öğretici biçimde anlatmalı.\n\
         5. Cevabı JSON olarak ver: text, options, correctAnswer (0 tabanlı indeks), explanation."
    )
}

#[must_use]
pub fn image_prompt(question_text: &str) -> String {
    format!(
        "Eğitim amaçlı, sade ve gerçekçi bir ilk yardım illüstrasyonu. Kan veya şiddet içermesin. \
         Sahne: {question_text}"
    )
}

/// Extraction prompt over at most `IMPORT_CONTENT_LIMIT` characters of `content`.
#[must_use]
pub fn import_prompt(content: &str) -> String {
    let excerpt: String = content.chars().take(IMPORT_CONTENT_LIMIT).collect();
    format!(
        "Aşağıdaki metin bir ilk yardım ders notu veya sınav belgesidir.\n\
         Metindeki çoktan seçmeli soruları çıkar. Metinde hazır soru yoksa içerikten 5 ile 20 arasında \
         yeni soru üret.\n\
         Her soru Türkçe olmalı, tam olarak 4 seçenek içermeli ve doğru cevabın 0 tabanlı indeksi \
         correctAnswer alanında verilmeli. Kısa bir açıklama ekle.\n\
         Cevabı JSON dizisi olarak ver.\n\n\
         METİN:\n{excerpt}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn import_prompt_truncates_on_char_boundary() {
        let content = "ş".repeat(IMPORT_CONTENT_LIMIT + 100);
        let prompt = import_prompt(&content);
        let excerpt = prompt.split("METİN:\n").nth(1).unwrap();
        assert_eq!(excerpt.chars().count(), IMPORT_CONTENT_LIMIT);
    }

    #[test]
    fn question_prompt_names_topic_and_difficulty() {
        let prompt = question_prompt(Topic::Burns, Difficulty::Hard);
        assert!(prompt.contains(Topic::Burns.label()));
        assert!(prompt.contains(Difficulty::Hard.label()));
    }
}
