use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    #[default]
    English,
    Hindi,
    Telugu,
    Odia,
    Bengali,
}

impl Language {
    pub const ALL: [Language; 5] = [
        Language::English,
        Language::Hindi,
        Language::Telugu,
        Language::Odia,
        Language::Bengali,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Hindi => "hi",
            Language::Telugu => "te",
            Language::Odia => "or",
            Language::Bengali => "bn",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLanguage(pub String);

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::ALL
            .into_iter()
            .find(|lang| lang.code() == s)
            .ok_or_else(|| UnknownLanguage(s.to_string()))
    }
}

const PROMPT_EN: &str = "You are a helpful assistant for tribal land rights and Community Forest Resources (CFR) in India. Help users with questions about their land, forest rights, IoT sensor data, and environmental monitoring. Be concise and respectful.";
const PROMPT_HI: &str = "आप भारत में आदिवासी भूमि अधिकारों और सामुदायिक वन संसाधनों (सीएफआर) के लिए एक सहायक सहायक हैं। उपयोगकर्ताओं को उनकी भूमि, वन अधिकार, आईओटी सेंसर डेटा और पर्यावरण निगरानी के बारे में प्रश्नों में मदद करें।";
const PROMPT_TE: &str = "మీరు భారతదేశంలో గిరిజన భూమి హక్కులు మరియు కమ్యూనిటీ ఫారెస్ట్ రిసోర్సెస్ (CFR) కోసం సహాయక సహాయకులు. వినియోగదారులకు వారి భూమి, అటవీ హక్కులు, IoT సెన్సార్ డేటా మరియు పర్యావరణ పర్యవేక్షణ గురించి ప్రశ్నలతో సహాయం చేయండి.";
const PROMPT_OR: &str = "ଆପଣ ଭାରତରେ ଆଦିବାସୀ ଜମି ଅଧିକାର ଏବଂ ସମ୍ପ୍ରଦାୟ ଜଙ୍ଗଲ ସମ୍ପଦ (CFR) ପାଇଁ ଏକ ସହାୟକ ସହାୟକ | ବ୍ୟବହାରକାରୀମାନଙ୍କୁ ସେମାନଙ୍କର ଜମି, ଜଙ୍ଗଲ ଅଧିକାର, IoT ସେନ୍ସର ତଥ୍ୟ ଏବଂ ପରିବେଶ ନିରୀକ୍ଷଣ ବିଷୟରେ ପ୍ରଶ୍ନରେ ସାହାଯ୍ୟ କରନ୍ତୁ |";
const PROMPT_BN: &str = "আপনি ভারতে উপজাতি ভূমি অধিকার এবং কমিউনিটি ফরেস্ট রিসোর্স (CFR) এর জন্য একজন সহায়ক সহায়ক। ব্যবহারকারীদের তাদের জমি, বন অধিকার, IoT সেন্সর ডেটা এবং পরিবেশ পর্যবেক্ষণ সম্পর্কে প্রশ্নে সহায়তা করুন।";

// Built once at startup and handed to the relay; never mutated.
#[derive(Debug, Clone)]
pub struct PromptTable {
    prompts: HashMap<Language, String>,
}

impl PromptTable {
    pub fn with_prompt(mut self, language: Language, prompt: impl Into<String>) -> Self {
        self.prompts.insert(language, prompt.into());
        self
    }

    pub fn get(&self, language: Language) -> &str {
        self.prompts
            .get(&language)
            .or_else(|| self.prompts.get(&Language::English))
            .map(String::as_str)
            .unwrap_or(PROMPT_EN)
    }
}

impl Default for PromptTable {
    fn default() -> Self {
        let prompts = [
            (Language::English, PROMPT_EN),
            (Language::Hindi, PROMPT_HI),
            (Language::Telugu, PROMPT_TE),
            (Language::Odia, PROMPT_OR),
            (Language::Bengali, PROMPT_BN),
        ]
        .into_iter()
        .map(|(lang, text)| (lang, text.to_string()))
        .collect();
        Self { prompts }
    }
}
