/// HTML rendering for the site
///
/// This server renders plain server-side HTML; no client-side framework.
/// Every page goes through [`layout`], which carries the nav bar and shows
/// either the signed-in username with a logout button or the login and
/// register links. All interpolated values pass through [`escape`].
///
/// Form pages take a [`FormErrors`] and render field errors directly under
/// the matching input, non-field errors above the form; a page rendered
/// with errors still returns 200.
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use inkpost_shared::models::post::PostSummary;

use crate::forms::{FormErrors, USERNAME_HELP_TEXT};

/// Escapes a string for safe interpolation into HTML text or attributes
pub fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

const STYLE: &str = "\
body{font-family:system-ui,sans-serif;max-width:40rem;margin:0 auto;padding:0 1rem;color:#222}\
nav{display:flex;justify-content:space-between;align-items:baseline;padding:1rem 0;border-bottom:1px solid #ddd}\
nav .brand{font-weight:700;text-decoration:none;color:#222}\
nav form{display:inline}\
nav button{background:none;border:none;color:#06c;cursor:pointer;font:inherit;padding:0;text-decoration:underline}\
form.account p{margin:1rem 0}\
label{display:block;margin-bottom:.25rem}\
input[type=text],input[type=password]{width:100%;padding:.4rem;box-sizing:border-box}\
.errorlist{color:#b00;margin:.25rem 0;padding-left:1.25rem}\
.helptext{color:#666;font-size:.85rem}\
article{padding:1rem 0;border-bottom:1px solid #eee}\
article h2{margin:0 0 .25rem}\
article .meta{color:#666;font-size:.85rem}";

/// Wraps page content in the base layout
///
/// `user` is the signed-in username, if any; it drives the nav bar.
fn layout(title: &str, user: Option<&str>, content: &str) -> String {
    let nav_right = match user {
        Some(username) => format!(
            "<span>signed in as <strong>{}</strong></span> \
             <form method=\"post\" action=\"/accounts/logout\">\
             <button type=\"submit\">Log out</button></form>",
            escape(username)
        ),
        None => "<a href=\"/accounts/login\">Log in</a> \
                 <a href=\"/accounts/register\">Register</a>"
            .to_string(),
    };

    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{} — Inkpost</title>\n\
         <style>{}</style>\n\
         </head>\n\
         <body>\n\
         <nav><a class=\"brand\" href=\"/posts\">Inkpost</a><div>{}</div></nav>\n\
         <main>\n{}\n</main>\n\
         </body>\n\
         </html>\n",
        escape(title),
        STYLE,
        nav_right,
        content
    )
}

/// Renders a list of error messages, or nothing when the list is empty
fn error_list(messages: &[String]) -> String {
    if messages.is_empty() {
        return String::new();
    }

    let items: String = messages
        .iter()
        .map(|m| format!("<li>{}</li>", escape(m)))
        .collect();
    format!("<ul class=\"errorlist\">{}</ul>", items)
}

/// A labeled text/password input with its errors and optional help text
fn form_field(
    label: &str,
    name: &str,
    input_type: &str,
    value: &str,
    errors: &FormErrors,
    help_text: Option<&str>,
) -> String {
    // Password inputs are never pre-filled
    let value_attr = if input_type == "password" || value.is_empty() {
        String::new()
    } else {
        format!(" value=\"{}\"", escape(value))
    };

    let help = help_text
        .map(|h| format!("<div class=\"helptext\">{}</div>", escape(h)))
        .unwrap_or_default();

    format!(
        "<p><label for=\"id_{name}\">{label}</label>\
         <input type=\"{input_type}\" name=\"{name}\" id=\"id_{name}\"{value_attr} required>\
         {errors}{help}</p>",
        label = escape(label),
        name = name,
        input_type = input_type,
        value_attr = value_attr,
        errors = error_list(errors.field(name)),
        help = help,
    )
}

/// The registration page
///
/// `username` is the previously submitted value, echoed back on a failed
/// submit; password fields are always blank.
pub fn register_page(username: &str, errors: &FormErrors, user: Option<&str>) -> String {
    let content = format!(
        "<h1>Register</h1>\n\
         {non_field}\
         <form method=\"post\" action=\"/accounts/register\" class=\"account\">\n\
         {username_field}\
         {password1_field}\
         {password2_field}\
         <p><button type=\"submit\">Register</button></p>\n\
         </form>",
        non_field = error_list(errors.non_field()),
        username_field = form_field(
            "Username",
            "username",
            "text",
            username,
            errors,
            Some(USERNAME_HELP_TEXT)
        ),
        password1_field = form_field("Password", "password1", "password", "", errors, None),
        password2_field = form_field(
            "Password confirmation",
            "password2",
            "password",
            "",
            errors,
            Some("Enter the same password as before, for verification.")
        ),
    );

    layout("Register", user, &content)
}

/// The login page
///
/// `next` is carried through as a hidden input so a successful login can
/// return to the page that required it.
pub fn login_page(
    username: &str,
    next: Option<&str>,
    errors: &FormErrors,
    user: Option<&str>,
) -> String {
    let next_input = next
        .map(|n| format!("<input type=\"hidden\" name=\"next\" value=\"{}\">", escape(n)))
        .unwrap_or_default();

    let content = format!(
        "<h1>Log in</h1>\n\
         {non_field}\
         <form method=\"post\" action=\"/accounts/login\" class=\"account\">\n\
         {username_field}\
         {password_field}\
         {next_input}\
         <p><button type=\"submit\">Log in</button></p>\n\
         </form>",
        non_field = error_list(errors.non_field()),
        username_field = form_field("Username", "username", "text", username, errors, None),
        password_field = form_field("Password", "password", "password", "", errors, None),
        next_input = next_input,
    );

    layout("Log in", user, &content)
}

/// The logout confirmation page
///
/// Logout changes state, so it only happens on POST; this page is the GET
/// side holding the button.
pub fn logout_page(user: Option<&str>) -> String {
    let content = match user {
        Some(username) => format!(
            "<h1>Log out</h1>\n\
             <p>You are signed in as <strong>{}</strong>. Log out?</p>\n\
             <form method=\"post\" action=\"/accounts/logout\">\n\
             <p><button type=\"submit\">Log out</button></p>\n\
             </form>",
            escape(username)
        ),
        None => "<h1>Log out</h1>\n\
                 <p>You are not signed in.</p>\n\
                 <p><a href=\"/posts\">Back to posts</a></p>"
            .to_string(),
    };

    layout("Log out", user, &content)
}

/// The post list page
pub fn post_list_page(posts: &[PostSummary], user: Option<&str>) -> String {
    let articles: String = if posts.is_empty() {
        "<p>No posts yet.</p>".to_string()
    } else {
        posts
            .iter()
            .map(|post| {
                format!(
                    "<article>\n\
                     <h2>{title}</h2>\n\
                     <div class=\"meta\">by {author} on {date}</div>\n\
                     <p>{body}</p>\n\
                     </article>",
                    title = escape(&post.title),
                    author = escape(&post.author_username),
                    date = format_date(&post.created_at),
                    body = escape(&post.body),
                )
            })
            .collect()
    };

    let content = format!("<h1>Posts</h1>\n{}", articles);
    layout("Posts", user, &content)
}

/// A bare error page for HTTP-level failures
///
/// Rendered outside any request context, so there is no nav state.
pub fn error_page(status: StatusCode) -> String {
    let (title, message) = match status {
        StatusCode::NOT_FOUND => ("Page not found", "The page you asked for doesn't exist."),
        StatusCode::BAD_REQUEST => ("Bad request", "The request couldn't be understood."),
        _ => ("Server error", "Something went wrong. Please try again later."),
    };

    layout(
        title,
        None,
        &format!("<h1>{}</h1>\n<p>{}</p>", title, message),
    )
}

fn format_date(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%b %e, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape("<script>alert('x')</script>"),
            "&lt;script&gt;alert(&#x27;x&#x27;)&lt;/script&gt;"
        );
        assert_eq!(escape("a & \"b\""), "a &amp; &quot;b&quot;");
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn test_register_page_contains_fields() {
        let page = register_page("", &FormErrors::new(), None);

        assert!(page.contains("name=\"username\""));
        assert!(page.contains("name=\"password1\""));
        assert!(page.contains("name=\"password2\""));
        assert!(page.contains("action=\"/accounts/register\""));
        assert!(page.contains("150 characters or fewer"));
    }

    #[test]
    fn test_register_page_echoes_username_escaped() {
        let page = register_page("eve\"><script>", &FormErrors::new(), None);

        assert!(page.contains("value=\"eve&quot;&gt;&lt;script&gt;\""));
        assert!(!page.contains("<script>"));
    }

    #[test]
    fn test_register_page_never_echoes_passwords() {
        let mut errors = FormErrors::new();
        errors.add_field("password2", "The two password fields didn't match.");
        let page = register_page("alice", &errors, None);

        // Password inputs carry no value attribute at all
        assert!(page.contains("name=\"password1\" id=\"id_password1\" required"));
        assert!(page.contains("The two password fields didn&#x27;t match."));
    }

    #[test]
    fn test_login_page_carries_next_as_hidden_input() {
        let page = login_page("", Some("/posts"), &FormErrors::new(), None);
        assert!(page.contains("type=\"hidden\" name=\"next\" value=\"/posts\""));
    }

    #[test]
    fn test_login_page_non_field_errors_rendered() {
        let mut errors = FormErrors::new();
        errors.add_non_field(crate::forms::INVALID_LOGIN_ERROR);
        let page = login_page("alice", None, &errors, None);

        assert!(page.contains("Please enter a correct username and password."));
        assert!(page.contains("value=\"alice\""));
    }

    #[test]
    fn test_nav_shows_login_links_when_anonymous() {
        let page = post_list_page(&[], None);
        assert!(page.contains("href=\"/accounts/login\""));
        assert!(page.contains("href=\"/accounts/register\""));
        assert!(!page.contains("signed in as"));
    }

    #[test]
    fn test_nav_shows_user_and_logout_when_signed_in() {
        let page = post_list_page(&[], Some("alice"));
        assert!(page.contains("signed in as <strong>alice</strong>"));
        assert!(page.contains("action=\"/accounts/logout\""));
        assert!(!page.contains("href=\"/accounts/login\""));
    }

    #[test]
    fn test_post_list_page_renders_posts_escaped() {
        let posts = vec![PostSummary {
            id: Uuid::new_v4(),
            title: "Hello <world>".to_string(),
            body: "First & foremost".to_string(),
            author_username: "alice".to_string(),
            created_at: Utc.with_ymd_and_hms(2026, 1, 12, 9, 30, 0).unwrap(),
        }];

        let page = post_list_page(&posts, None);
        assert!(page.contains("Hello &lt;world&gt;"));
        assert!(page.contains("First &amp; foremost"));
        assert!(page.contains("by alice on"));
        assert!(page.contains("2026"));
    }

    #[test]
    fn test_post_list_page_empty_state() {
        let page = post_list_page(&[], None);
        assert!(page.contains("No posts yet."));
    }

    #[test]
    fn test_logout_page_signed_in_has_confirm_form() {
        let page = logout_page(Some("alice"));
        assert!(page.contains("method=\"post\""));
        assert!(page.contains("action=\"/accounts/logout\""));
    }

    #[test]
    fn test_logout_page_anonymous() {
        let page = logout_page(None);
        assert!(page.contains("You are not signed in."));
    }

    #[test]
    fn test_error_pages() {
        assert!(error_page(StatusCode::NOT_FOUND).contains("Page not found"));
        assert!(error_page(StatusCode::INTERNAL_SERVER_ERROR).contains("Server error"));
    }
}
