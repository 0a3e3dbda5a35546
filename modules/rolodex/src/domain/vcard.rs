//! vCard 3.0 rendering for profile sharing (QR "vcard" mode).

use crate::domain::model::User;

/// Render a user's shareable card. The profile URL is included so scanners
/// without a vCard reader can still reach the public profile.
pub fn from_user(user: &User, public_url: &str) -> String {
    let mut card = String::from("BEGIN:VCARD\nVERSION:3.0\n");

    card.push_str(&format!("FN:{}\n", escape(&user.name)));
    card.push_str(&format!("N:{};;;;\n", escape(&user.name)));
    card.push_str(&format!("EMAIL:{}\n", escape(&user.email)));

    if let Some(mobile) = &user.mobile {
        card.push_str(&format!("TEL;TYPE=CELL:{}\n", escape(mobile)));
    }
    if let Some(whatsapp) = &user.whatsapp {
        card.push_str(&format!("TEL;TYPE=CELL,WA:{}\n", escape(whatsapp)));
    }
    if let Some(linkedin) = &user.linkedin_url {
        card.push_str(&format!("URL:{}\n", escape(linkedin)));
    }
    if let Some(role) = &user.role_company {
        card.push_str(&format!("TITLE:{}\n", escape(role)));
    }
    if let Some(about) = &user.about_me {
        card.push_str(&format!("NOTE:{}\n", escape(about)));
    }
    if let Some(photo) = &user.profile_photo_url {
        card.push_str(&format!("PHOTO;VALUE=URI:{}\n", escape(photo)));
    }

    let profile_url = format!("{}/profile/{}", public_url.trim_end_matches('/'), user.id);
    card.push_str(&format!("URL;TYPE=PROFILE:{}\n", escape(&profile_url)));

    card.push_str("END:VCARD");
    card
}

/// Escape per RFC 2426: backslash, comma, semicolon and newlines.
fn escape(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace(',', "\\,")
        .replace(';', "\\;")
        .replace('\r', "")
        .replace('\n', "\\n")
}
