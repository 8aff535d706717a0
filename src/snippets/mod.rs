//! The default snippet bundle.
//!
//! | Tag | Output |
//! |-----|--------|
//! | `link` | anchor, internal links resolved |
//! | `email` | `mailto:` anchor |
//! | `tel` | `tel:` anchor |
//! | `image` | `<img>`, optionally wrapped in an anchor |
//! | `file` | anchor to a downloadable file |
//! | `youtube` | embedded video or playlist |
//! | `vimeo` | embedded video |
//! | `twitter` | profile, hashtag or search link |
//! | `gist` | embedded gist script |

mod html;
mod links;
mod template;

use std::sync::OnceLock;

use regex::Regex;

use crate::registry::{HandlerEntry, SnippetBundle};
use crate::types::{BoundArguments, ParamSpec, ParsedValue};

pub use html::{escape, html_attributes};
pub use links::{is_valid_domain_name, SiteLinks};
pub use template::{placeholders, render_template, template_entry, TemplateDef};

/// The built-in snippets.
#[derive(Debug, Clone, Default)]
pub struct DefaultSnippets {
    links: SiteLinks,
}

impl DefaultSnippets {
    pub fn new(links: SiteLinks) -> Self {
        Self { links }
    }
}

impl SnippetBundle for DefaultSnippets {
    fn entries(&self) -> Vec<HandlerEntry> {
        vec![
            link(self.links.clone()),
            email(),
            tel(),
            image(self.links.clone()),
            file(self.links.clone()),
            youtube(),
            vimeo(),
            twitter(),
            gist(),
        ]
    }
}

fn anchor(href: &str, attributes: &str, text: &str) -> String {
    format!("<a href='{}'{}>{}</a>", escape(href), attributes, text)
}

fn iframe(width: &str, height: &str, src: &str) -> String {
    format!(
        "<iframe width=\"{}\" height=\"{}\" src=\"{}\" frameborder=\"0\" webkitallowfullscreen mozallowfullscreen allowfullscreen></iframe>",
        escape(width),
        escape(height),
        src
    )
}

/// Text of `text`, or of `fallback` when no text was given.
fn text_or(args: &BoundArguments, fallback: &str) -> String {
    args.text("text")
        .unwrap_or_else(|| args.text_or_empty(fallback))
}

fn link(links: SiteLinks) -> HandlerEntry {
    HandlerEntry::new(
        "link",
        vec![
            ParamSpec::required("link"),
            ParamSpec::optional("text"),
            ParamSpec::optional("title"),
            ParamSpec::with_default("popup", "false"),
            ParamSpec::optional("class"),
        ],
        move |args| {
            let text = text_or(args, "link");
            let href = links.resolve(&args.text_or_empty("link"));
            let blank = ParsedValue::scalar("blank");
            let target = args.is_true("popup").then_some(&blank);
            let attributes = html_attributes([
                ("title", args.value("title")),
                ("target", target),
                ("class", args.value("class")),
            ]);
            Ok(anchor(&href, &attributes, &text))
        },
    )
    .with_description("Link to a page, file or external site")
}

fn email() -> HandlerEntry {
    HandlerEntry::new(
        "email",
        vec![
            ParamSpec::required("address"),
            ParamSpec::optional("text"),
            ParamSpec::optional("title"),
            ParamSpec::optional("class"),
        ],
        |args| {
            let address = args.text_or_empty("address");
            let attributes = html_attributes([
                ("title", args.value("title")),
                ("class", args.value("class")),
            ]);
            Ok(anchor(
                &format!("mailto:{}", address),
                &attributes,
                &text_or(args, "address"),
            ))
        },
    )
    .with_description("Link to an email address")
}

fn tel() -> HandlerEntry {
    HandlerEntry::new(
        "tel",
        vec![
            ParamSpec::required("nr"),
            ParamSpec::optional("text"),
            ParamSpec::optional("class"),
        ],
        |args| {
            let nr = args.text_or_empty("nr");
            let attributes = html_attributes([("class", args.value("class"))]);
            Ok(anchor(&format!("tel:{}", nr), &attributes, &text_or(args, "nr")))
        },
    )
    .with_description("Link to a phone number")
}

fn image(links: SiteLinks) -> HandlerEntry {
    HandlerEntry::new(
        "image",
        vec![
            ParamSpec::required("image"),
            ParamSpec::optional("width"),
            ParamSpec::optional("height"),
            ParamSpec::optional("alt"),
            ParamSpec::optional("class"),
            ParamSpec::optional("link"),
            ParamSpec::optional("caption"),
            ParamSpec::optional("srcset"),
        ],
        move |args| {
            let src = links.resolve(&args.text_or_empty("image"));
            let attributes = html_attributes([
                ("width", args.value("width")),
                ("height", args.value("height")),
                ("alt", args.value("alt")),
                ("caption", args.value("caption")),
                ("class", args.value("class")),
                ("srcset", args.value("srcset")),
            ]);
            let img = format!("<img src='{}'{} />", escape(&src), attributes);

            match args.text("link") {
                Some(target) => Ok(anchor(&links.resolve(&target), "", &img)),
                None => Ok(img),
            }
        },
    )
    .with_description("Embed an image")
}

fn file(links: SiteLinks) -> HandlerEntry {
    HandlerEntry::new(
        "file",
        vec![
            ParamSpec::required("file"),
            ParamSpec::optional("text"),
            ParamSpec::optional("download"),
            ParamSpec::optional("class"),
        ],
        move |args| {
            let text = text_or(args, "file");
            let href = links.resolve(&args.text_or_empty("file"));
            let mut attributes = html_attributes([("class", args.value("class"))]);
            if args.is_true("download") {
                attributes.push_str(" download target='_blank'");
            }
            Ok(anchor(&href, &attributes, &text))
        },
    )
    .with_description("Link to a downloadable file")
}

fn parse_loose_url(link: &str) -> Option<url::Url> {
    url::Url::parse(link)
        .or_else(|_| url::Url::parse(&format!("http://{}", link.trim_start_matches('/'))))
        .ok()
}

fn youtube() -> HandlerEntry {
    HandlerEntry::new(
        "youtube",
        vec![
            ParamSpec::required("link"),
            ParamSpec::with_default("width", "480"),
            ParamSpec::with_default("height", "360"),
        ],
        |args| {
            let Some(url) = parse_loose_url(&args.text_or_empty("link")) else {
                return Ok(String::new());
            };
            let query = |key: &str| {
                url.query_pairs()
                    .find(|(k, _)| k == key)
                    .map(|(_, v)| v.into_owned())
            };

            let embed = if let Some(list) = query("list") {
                format!(
                    "//www.youtube.com/embed?listType=playlist&amp;list={}",
                    urlencoding::encode(&list)
                )
            } else if let Some(video) = query("v") {
                format!("//www.youtube.com/embed/{}", urlencoding::encode(&video))
            } else {
                log::debug!("youtube link without video or playlist id");
                return Ok(String::new());
            };

            Ok(iframe(
                &args.text_or_empty("width"),
                &args.text_or_empty("height"),
                &embed,
            ))
        },
    )
    .with_description("Embed a YouTube video or playlist")
}

fn vimeo_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"(https?://)?(www\.)?(player\.)?vimeo\.com/([a-z]*/)*(?P<video_id>[0-9]{6,11})[?]?.*",
        )
        .expect("vimeo pattern is valid")
    })
}

fn vimeo() -> HandlerEntry {
    HandlerEntry::new(
        "vimeo",
        vec![
            ParamSpec::required("link"),
            ParamSpec::with_default("width", "480"),
            ParamSpec::with_default("height", "360"),
            ParamSpec::with_default("portrait", "true"),
            ParamSpec::with_default("title", "true"),
            ParamSpec::with_default("byline", "true"),
        ],
        |args| {
            let link = args.text_or_empty("link");
            let Some(caps) = vimeo_pattern().captures(&link) else {
                return Ok(String::new());
            };

            let mut embed = format!("//player.vimeo.com/video/{}", &caps["video_id"]);
            let opts: Vec<String> = ["portrait", "title", "byline"]
                .into_iter()
                .filter(|flag| !args.is_true(flag))
                .map(|flag| format!("{}=0", flag))
                .collect();
            if !opts.is_empty() {
                embed.push('?');
                embed.push_str(&opts.join("&amp;"));
            }

            Ok(iframe(
                &args.text_or_empty("width"),
                &args.text_or_empty("height"),
                &embed,
            ))
        },
    )
    .with_description("Embed a Vimeo video")
}

fn twitter() -> HandlerEntry {
    HandlerEntry::new(
        "twitter",
        vec![
            ParamSpec::required("what"),
            ParamSpec::optional("text"),
            ParamSpec::optional("class"),
        ],
        |args| {
            let what = args.text_or_empty("what");
            let attributes = html_attributes([("class", args.value("class"))]);

            let href = if let Some(tag) = what.strip_prefix('#') {
                if what.contains(' ') {
                    format!("https://twitter.com/search?q={}", urlencoding::encode(&what))
                } else {
                    format!("https://www.twitter.com/hashtag/{}", tag)
                }
            } else {
                format!("https://www.twitter.com/{}", what.trim_start_matches('@'))
            };

            Ok(anchor(&href, &attributes, &text_or(args, "what")))
        },
    )
    .with_description("Link to a Twitter profile, hashtag or search")
}

fn gist_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[0-9]+").expect("gist id pattern is valid"))
}

fn gist() -> HandlerEntry {
    HandlerEntry::new(
        "gist",
        vec![ParamSpec::required("link"), ParamSpec::optional("file")],
        |args| {
            let mut src = args.text_or_empty("link");
            if let Some(id) = gist_id_pattern().find(&src) {
                let mut script = format!("https://gist.github.com/{}.js", id.as_str());
                if let Some(file) = args.text("file") {
                    script.push_str("?file=");
                    script.push_str(&urlencoding::encode(&file));
                }
                src = script;
            }
            Ok(format!("<script src='{}'></script>", escape(&src)))
        },
    )
    .with_description("Embed a GitHub gist")
}
