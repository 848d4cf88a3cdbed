// All LLM prompt constants for the advisor module.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System prompt for keyword generation.
pub const KEYWORD_SYSTEM: &str = "You are an AI assistant that helps students find \
    internship openings relevant to a specific job role.";

/// Keyword prompt template. Replace `{position}` before sending.
pub const KEYWORD_PROMPT_TEMPLATE: &str = r#"Kamu membantu mahasiswa mencari lowongan magang.
Berikan 10 sampai 25 kata kunci spesifik yang paling relevan untuk posisi magang: "{position}".

Aturan:
1. Tentukan apakah "{position}" adalah jabatan spesifik atau bidang umum.
2. Jika jabatan spesifik, masukkan nama jabatannya sebagai salah satu kata kunci.
3. Jika bidang umum, utamakan keterampilan dan tools yang dipakai di bidang itu.
4. Hindari kata generik seperti "magang", "kerja", "digital", "TI", atau "bisnis".
5. Utamakan tools, keterampilan, platform, metode, dan istilah teknis.

Pisahkan kata kunci dengan koma."#;

/// System prompt for CV evaluation.
pub const CV_SYSTEM: &str =
    "You are an ATS assistant who evaluates CV fit for internship positions.";

/// Opening of the CV evaluation prompt.
pub const CV_INSTRUCTIONS: &str = "### INSTRUKSI
Berperanlah sebagai ATS Career Coach. Nilai kecocokan kandidat untuk lowongan di bawah \
dan berikan panduan pengembangan karier yang terstruktur.";

/// Default analysis procedure and output format. `CV_PROMPT_PATH` replaces it.
pub const DEFAULT_CV_PROCEDURE: &str = "#### Prosedur
1. Kumpulkan 6-10 skill krusial dari deskripsi lowongan dan definisi posisi.
2. Untuk tiap skill, tandai ada atau tidak di CV. Sertakan kutipan bukti singkat (maksimal 12 kata).
3. Uraikan minimal 2 kekuatan dan 2 kekurangan utama kandidat.
4. Kategorikan profil kandidat: Spesialis, Generalis, atau Mixed, beserta dampaknya.
5. Beri skor kecocokan 0-100 dan perkiraan probabilitas dipanggil wawancara (%).
6. Susun roadmap peningkatan 7, 14, dan 21 hari yang menutup kekurangan.

#### Format keluaran
Ringkasan
<3-4 kalimat>

Skor Kecocokan: <angka>
Probabilitas Dipanggil: <angka>%

| Skill | Ada | Bukti |
|-------|-----|-------|

Kekuatan
- ...

Kekurangan
- ...

Pengetahuan/Kapasitas: <Spesialis/Generalis/Mixed> - <alasan>

Roadmap
7 Hari: ...
14 Hari: ...
21 Hari: ...";

/// Used when no definition could be fetched for the position title.
pub const DEFINITION_NOT_FOUND: &str = "Definisi tidak ditemukan.";
