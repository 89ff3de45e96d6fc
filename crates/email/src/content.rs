//! Shared email content templates
//!
//! Canonical content generators for tournament notification emails, used by
//! every email service implementation.

/// Generate plain-text body for a "round started" email.
pub fn round_started_text(tournament_name: &str) -> String {
    format!(
        "Hi there!\n\n\
        The matches for the tournament '{}' have been drawn.\n\n\
        Check your bracket to see who your team faces in this round.\n\n\
        Good luck,\n\
        The Knockout Team",
        tournament_name
    )
}

/// Generate styled HTML body for a "round started" email.
pub fn round_started_html(tournament_name: &str) -> String {
    format!(
        r#"
            <html>
            <body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333;">
                <div style="max-width: 600px; margin: 0 auto; padding: 20px;">
                    <h2 style="color: #007cba;">Matches are on!</h2>

                    <p>Hi there!</p>

                    <p>The matches for the tournament '<strong>{tournament_name}</strong>' have been drawn.</p>

                    <p>Check your bracket to see who your team faces in this round.</p>

                    <hr style="border: none; border-top: 1px solid #eee; margin: 30px 0;">

                    <p style="color: #666; font-size: 12px;">
                        Good luck, The Knockout Team
                    </p>
                </div>
            </body>
            </html>
            "#,
        tournament_name = tournament_name,
    )
}

/// Generate plain-text body for a champion email.
pub fn champion_text(tournament_name: &str) -> String {
    format!(
        "Congratulations!\n\n\
        Your team has won the tournament '{}'.\n\n\
        Every other team has been eliminated and the title is yours.\n\n\
        Well played,\n\
        The Knockout Team",
        tournament_name
    )
}

/// Generate styled HTML body for a champion email.
pub fn champion_html(tournament_name: &str) -> String {
    format!(
        r#"
            <html>
            <body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333;">
                <div style="max-width: 600px; margin: 0 auto; padding: 20px;">
                    <h2 style="color: #007cba;">Champions of {tournament_name}!</h2>

                    <p>Congratulations!</p>

                    <p>Your team has won the tournament '<strong>{tournament_name}</strong>'.
                    Every other team has been eliminated and the title is yours.</p>

                    <hr style="border: none; border-top: 1px solid #eee; margin: 30px 0;">

                    <p style="color: #666; font-size: 12px;">
                        Well played, The Knockout Team
                    </p>
                </div>
            </body>
            </html>
            "#,
        tournament_name = tournament_name,
    )
}

/// Generate plain-text body for an enrollment confirmation email.
pub fn enrollment_accepted_text(team_name: &str, tournament_name: &str) -> String {
    format!(
        "Hi there!\n\n\
        Your team '{}' is now enrolled in the tournament '{}'.\n\n\
        You will receive another email as soon as the bracket is drawn.\n\n\
        Thanks,\n\
        The Knockout Team",
        team_name, tournament_name
    )
}

/// Generate styled HTML body for an enrollment confirmation email.
pub fn enrollment_accepted_html(team_name: &str, tournament_name: &str) -> String {
    format!(
        r#"
            <html>
            <body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333;">
                <div style="max-width: 600px; margin: 0 auto; padding: 20px;">
                    <h2 style="color: #007cba;">Enrollment confirmed</h2>

                    <p>Hi there!</p>

                    <p>Your team '<strong>{team_name}</strong>' is now enrolled in the
                    tournament '<strong>{tournament_name}</strong>'.</p>

                    <p>You will receive another email as soon as the bracket is drawn.</p>

                    <hr style="border: none; border-top: 1px solid #eee; margin: 30px 0;">

                    <p style="color: #666; font-size: 12px;">
                        Thanks, The Knockout Team
                    </p>
                </div>
            </body>
            </html>
            "#,
        team_name = team_name,
        tournament_name = tournament_name,
    )
}
