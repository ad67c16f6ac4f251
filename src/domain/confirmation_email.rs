pub const CONFIRMATION_SUBJECT: &str = "You’re in! Let’s Do More, Stress Less 🚀";
pub const COMMUNITY_URL: &str = "https://chat.whatsapp.com/Hk5JXPsptxn1n4JX7Z9sIM";

/// The welcome email sent once a waitlist entry has been stored.
///
/// Only the recipient's name varies between two renders.
pub struct ConfirmationEmail {
    pub html_body: String,
    pub text_body: String,
}

impl ConfirmationEmail {
    pub fn render(name: Option<&str>, base_url: &str) -> Self {
        let name = name.map(str::trim).filter(|n| !n.is_empty());
        let greeting = match name {
            Some(name) => format!("Hey {}!", escape_html(name)),
            None => "Hey!".to_string(),
        };
        let logo_url = format!("{}/images/logo.png", base_url.trim_end_matches('/'));

        let html_body = format!(
            r#"<!DOCTYPE html>
<html>
  <body style="margin:0; padding:0; background-color:#0f172a; font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',Roboto,Helvetica,Arial,sans-serif;">
    <table width="100%" cellpadding="0" cellspacing="0">
      <tr>
        <td align="center" style="padding:40px 16px;">
          <table width="100%" style="max-width:600px; background-color:#020617; border-radius:16px; padding:32px; color:#e5e7eb;">
            <tr>
              <td align="center" style="padding-bottom:24px;">
                <img src="{logo_url}" width="140" alt="Workdistro" />
              </td>
            </tr>
            <tr>
              <td>
                <h1 style="color:#fff;">You’re in! Let’s Do More, Stress Less 💪</h1>
                <p style="color:#d1d5db;">
                  {greeting} 👋<br /><br />
                  You’ve officially joined the <strong>Workdistro</strong> squad.
                </p>
                <ul style="color:#d1d5db;">
                  <li>🎉 Discount on your first task</li>
                  <li>👥 Access to our members-only community</li>
                </ul>
                <a
                  href="{COMMUNITY_URL}"
                  style="display:inline-block; margin-top:20px; padding:14px 28px; background:#141941; color:#fff; text-decoration:none; border-radius:12px; font-weight:600;"
                >
                  Join the Community
                </a>
                <p style="margin-top:24px; color:#9ca3af;">
                  Do more. Stress less.<br />
                  <strong>The Workdistro Team</strong>
                </p>
              </td>
            </tr>
          </table>
        </td>
      </tr>
    </table>
  </body>
</html>"#
        );

        let plain_greeting = match name {
            Some(name) => format!("Hey {name}!"),
            None => "Hey!".to_string(),
        };
        let text_body = format!(
            "{plain_greeting}\n\n\
             You’ve officially joined the Workdistro squad.\n\n\
             - Discount on your first task\n\
             - Access to our members-only community\n\n\
             Join the community: {COMMUNITY_URL}\n\n\
             Do more. Stress less.\n\
             The Workdistro Team\n"
        );

        Self {
            html_body,
            text_body,
        }
    }
}

fn escape_html(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}
