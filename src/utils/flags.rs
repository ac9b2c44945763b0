/// Flag shown for teams not decided yet
pub const TBD_FLAG: &str = "🏴";
/// Flag shown for names missing from the table
pub const UNKNOWN_FLAG: &str = "🏳️";

// World Cup 2026 candidates, English and Spanish spellings
const TEAM_FLAGS: &[(&str, &str)] = &[
    // CONCACAF
    ("México", "🇲🇽"),
    ("Mexico", "🇲🇽"),
    ("EE. UU.", "🇺🇸"),
    ("USA", "🇺🇸"),
    ("Canadá", "🇨🇦"),
    ("Canada", "🇨🇦"),
    ("Costa Rica", "🇨🇷"),
    ("Jamaica", "🇯🇲"),
    ("Panamá", "🇵🇦"),
    ("Panama", "🇵🇦"),
    ("Honduras", "🇭🇳"),
    ("Haití", "🇭🇹"),
    ("Haiti", "🇭🇹"),
    ("Curazao", "🇨🇼"),
    ("Curaçao", "🇨🇼"),
    // CONMEBOL
    ("Argentina", "🇦🇷"),
    ("Brasil", "🇧🇷"),
    ("Brazil", "🇧🇷"),
    ("Uruguay", "🇺🇾"),
    ("Colombia", "🇨🇴"),
    ("Ecuador", "🇪🇨"),
    ("Paraguay", "🇵🇾"),
    ("Chile", "🇨🇱"),
    ("Perú", "🇵🇪"),
    ("Peru", "🇵🇪"),
    ("Bolivia", "🇧🇴"),
    ("Venezuela", "🇻🇪"),
    // UEFA
    ("España", "🇪🇸"),
    ("Spain", "🇪🇸"),
    ("Alemania", "🇩🇪"),
    ("Germany", "🇩🇪"),
    ("Francia", "🇫🇷"),
    ("France", "🇫🇷"),
    ("Inglaterra", "🏴󠁧󠁢󠁥󠁮󠁧󠁿"),
    ("England", "🏴󠁧󠁢󠁥󠁮󠁧󠁿"),
    ("Portugal", "🇵🇹"),
    ("Países Bajos", "🇳🇱"),
    ("Netherlands", "🇳🇱"),
    ("Bélgica", "🇧🇪"),
    ("Belgium", "🇧🇪"),
    ("Italia", "🇮🇹"),
    ("Italy", "🇮🇹"),
    ("Croacia", "🇭🇷"),
    ("Croatia", "🇭🇷"),
    ("Suiza", "🇨🇭"),
    ("Switzerland", "🇨🇭"),
    ("Dinamarca", "🇩🇰"),
    ("Denmark", "🇩🇰"),
    ("Suecia", "🇸🇪"),
    ("Sweden", "🇸🇪"),
    ("Noruega", "🇳🇴"),
    ("Norway", "🇳🇴"),
    ("Polonia", "🇵🇱"),
    ("Poland", "🇵🇱"),
    ("Ucrania", "🇺🇦"),
    ("Ukraine", "🇺🇦"),
    ("Serbia", "🇷🇸"),
    ("Austria", "🇦🇹"),
    ("República Checa", "🇨🇿"),
    ("Czech Republic", "🇨🇿"),
    ("Escocia", "🏴󠁧󠁢󠁳󠁣󠁴󠁿"),
    ("Scotland", "🏴󠁧󠁢󠁳󠁣󠁴󠁿"),
    ("Gales", "🏴󠁧󠁢󠁷󠁬󠁳󠁿"),
    ("Wales", "🏴󠁧󠁢󠁷󠁬󠁳󠁿"),
    ("Irlanda", "🇮🇪"),
    ("Ireland", "🇮🇪"),
    ("Turquía", "🇹🇷"),
    ("Turkey", "🇹🇷"),
    ("Rumania", "🇷🇴"),
    ("Romania", "🇷🇴"),
    ("Grecia", "🇬🇷"),
    ("Greece", "🇬🇷"),
    // AFC
    ("Japón", "🇯🇵"),
    ("Japan", "🇯🇵"),
    ("República de Corea", "🇰🇷"),
    ("South Korea", "🇰🇷"),
    ("Korea", "🇰🇷"),
    ("Australia", "🇦🇺"),
    ("Irán", "🇮🇷"),
    ("Iran", "🇮🇷"),
    ("Arabia Saudí", "🇸🇦"),
    ("Saudi Arabia", "🇸🇦"),
    ("Catar", "🇶🇦"),
    ("Qatar", "🇶🇦"),
    ("Irak", "🇮🇶"),
    ("Iraq", "🇮🇶"),
    ("Emiratos Árabes Unidos", "🇦🇪"),
    ("UAE", "🇦🇪"),
    ("Uzbekistán", "🇺🇿"),
    ("Uzbekistan", "🇺🇿"),
    ("Jordania", "🇯🇴"),
    ("Jordan", "🇯🇴"),
    ("China", "🇨🇳"),
    ("Tailandia", "🇹🇭"),
    ("Thailand", "🇹🇭"),
    // CAF
    ("Senegal", "🇸🇳"),
    ("Marruecos", "🇲🇦"),
    ("Morocco", "🇲🇦"),
    ("Túnez", "🇹🇳"),
    ("Tunisia", "🇹🇳"),
    ("Argelia", "🇩🇿"),
    ("Algeria", "🇩🇿"),
    ("Egipto", "🇪🇬"),
    ("Egypt", "🇪🇬"),
    ("Nigeria", "🇳🇬"),
    ("Ghana", "🇬🇭"),
    ("Camerún", "🇨🇲"),
    ("Cameroon", "🇨🇲"),
    ("Costa de Marfil", "🇨🇮"),
    ("Ivory Coast", "🇨🇮"),
    ("Malí", "🇲🇱"),
    ("Mali", "🇲🇱"),
    ("Burkina Faso", "🇧🇫"),
    ("Sudáfrica", "🇿🇦"),
    ("South Africa", "🇿🇦"),
    ("Islas de Cabo Verde", "🇨🇻"),
    ("Cape Verde", "🇨🇻"),
    // OFC
    ("Nueva Zelanda", "🇳🇿"),
    ("New Zealand", "🇳🇿"),
];

/// Flag emoji for a team name
pub fn team_flag(team: Option<&str>) -> &'static str {
    match team.map(str::trim) {
        None | Some("") | Some("TBD") => TBD_FLAG,
        Some(name) => TEAM_FLAGS
            .iter()
            .find(|(team, _)| *team == name)
            .map(|(_, flag)| *flag)
            .unwrap_or(UNKNOWN_FLAG),
    }
}
