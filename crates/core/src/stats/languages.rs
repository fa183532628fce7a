//! Locale code → display-name lookup.
//!
//! Closed table. Unrecognized locale codes pass through unchanged so a
//! newly added target language shows up in the report under its raw
//! code instead of disappearing.

/// Map a locale code like `fr_FR` to its display name.
pub fn language_name(locale: &str) -> &str {
    match locale {
        "ar_AE" => "Arabic (UAE)",
        "ar_EG" => "Arabic (Egypt)",
        "ar_SA" => "Arabic (Saudi Arabia)",
        "bg_BG" => "Bulgarian",
        "ceb" => "Cebuano",
        "cs_CZ" => "Czech",
        "da_DK" => "Danish",
        "de_DE" => "German",
        "el_CY" => "Greek (Cyprus)",
        "el_GR" => "Greek",
        "en_US" => "English (US)",
        "en_GB" => "English (UK)",
        "es_ES" => "Spanish",
        "es_MX" => "Spanish (Mexico)",
        "et_EE" => "Estonian",
        "fa_IR" => "Persian",
        "fi_FI" => "Finnish",
        "fj_FJ" => "Fijian",
        "fr_FR" => "French",
        "hr_BA" => "Croatian (Bosnia)",
        "hr_HR" => "Croatian",
        "ht_HT" => "Haitian Creole",
        "hu_HU" => "Hungarian",
        "hy_AM" => "Armenian",
        "id_ID" => "Indonesian",
        "is_IS" => "Icelandic",
        "it_IT" => "Italian",
        "ja_JP" => "Japanese",
        "ka_GE" => "Georgian",
        "kk_KZ" => "Kazakh",
        "km_KH" => "Khmer",
        "ko_KR" => "Korean",
        "lo_LA" => "Lao",
        "lt_LT" => "Lithuanian",
        "lv_LV" => "Latvian",
        "mg_MG" => "Malagasy",
        "mk_MK" => "Macedonian",
        "mn_MN" => "Mongolian",
        "ms_MY" => "Malay",
        "nl_NL" => "Dutch",
        "no_NO" => "Norwegian",
        "pl_PL" => "Polish",
        "pt_BR" => "Portuguese (Brazil)",
        "pt_PT" => "Portuguese (Portugal)",
        "ro_RO" => "Romanian",
        "ru_RU" => "Russian",
        "sk_SK" => "Slovak",
        "sl_SI" => "Slovenian",
        "sm_WS" => "Samoan",
        "sq_AL" => "Albanian",
        "sr_RS" => "Serbian",
        "sv_SE" => "Swedish",
        "sw_KE" => "Swahili (Kenya)",
        "sw_TZ" => "Swahili (Tanzania)",
        "th_TH" => "Thai",
        "tl_PH" => "Tagalog",
        "to_TO" => "Tongan",
        "tr_TR" => "Turkish",
        "ty" => "Tahitian",
        "uk_UA" => "Ukrainian",
        "ur_IN" => "Urdu",
        "vi_VN" => "Vietnamese",
        "zh_CN" => "Chinese (Simplified)",
        "zh_HK" => "Chinese (Hong Kong)",
        "zh_TW" => "Chinese (Traditional)",
        other => other,
    }
}
