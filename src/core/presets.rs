#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Preset {
    Adventure,
    LoveRomance,
    Fantasy,
    Comedy,
    Empty,
}

impl Preset {
    /// Button order on the prompt screen.
    pub const ALL: [Preset; 5] = [
        Preset::Adventure,
        Preset::LoveRomance,
        Preset::Fantasy,
        Preset::Comedy,
        Preset::Empty,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Preset::Adventure => "Adventure",
            Preset::LoveRomance => "Love romance",
            Preset::Fantasy => "Fantasy",
            Preset::Comedy => "Comedy",
            Preset::Empty => "Empty",
        }
    }

    pub fn text(self) -> &'static str {
        match self {
            Preset::Adventure => ADVENTURE,
            Preset::LoveRomance => LOVE_ROMANCE,
            Preset::Fantasy => FANTASY,
            Preset::Comedy => COMEDY,
            Preset::Empty => "",
        }
    }

    pub fn from_label(label: &str) -> Option<Preset> {
        Preset::ALL.into_iter().find(|p| p.label() == label)
    }
}

const ADVENTURE: &str = "A young cartographer discovers that the old map left by her grandfather \
leads to a lost city buried under the Saharan dunes. With a grumpy camel driver and a stolen \
compass, she crosses the desert before a rival expedition reaches the city first.";

const LOVE_ROMANCE: &str = "Two strangers keep missing each other on the last night train from \
Paris to Venice. Each evening they leave notes in the same book of the dining car library, \
until one night the train stops in the snow and they finally meet.";

const FANTASY: &str = "In a kingdom where every spoken lie turns into a moth, a baker's apprentice \
realises the royal palace is covered in millions of them. She must find the liar before the \
swarm blocks out the sun for good.";

const COMEDY: &str = "A retired magician moves into a quiet village and accidentally makes the \
mayor's prize-winning pumpkin disappear the day before the harvest festival. He has one night \
to get it back, with the help of a rabbit who refuses to go back into the hat.";
