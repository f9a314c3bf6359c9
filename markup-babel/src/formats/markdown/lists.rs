//! Todo list post-processing
//!
//! comrak only knows bullet and ordered lists. Checkbox items are recognized here, on the token
//! stream, before the tree is built:
//!
//! 1. Reclassify. A bullet list item whose first paragraph starts with `[ ]`, `[x]` or `[X]`
//!    followed by a space (or NBSP) becomes a `todo_item`. The marker is stripped, `checked` is
//!    recorded, and a `<!-- todoid=…,userid=… -->` comment in the same inline run is turned into
//!    the item's `todoid`/`userid` attrs.
//! 2. Split. Each bullet list is re-emitted as a run of homogeneous sibling lists: consecutive
//!    todo items go into a `todo_list`, consecutive plain items into a `bullet_list`. Nested lists
//!    are handled at their own level because only direct items of a list decide its runs.
//!
//! Both passes produce a new token sequence; nothing is spliced in place.

use super::token::{Nesting, Token, TokenKind};

/// Apply todo reclassification and run splitting to a block token stream.
pub fn process_todo_lists(tokens: Vec<Token>) -> Vec<Token> {
    split_by_run(reclassify_items(tokens))
}

/// Checkbox marker at the start of `text`: `Some(checked)` when present.
fn todo_marker(text: &str) -> Option<bool> {
    let mut chars = text.chars();
    if chars.next()? != '[' {
        return None;
    }
    let state = chars.next()?;
    if chars.next()? != ']' {
        return None;
    }
    if !matches!(chars.next()?, ' ' | '\u{a0}') {
        return None;
    }
    match state {
        'x' | 'X' => Some(true),
        ' ' | '\u{a0}' => Some(false),
        _ => None,
    }
}

/// `<!-- todoid=..,userid=.. -->` metadata carried by a serialized todo item
#[derive(Debug, Default, PartialEq)]
struct TodoMeta {
    todoid: Option<String>,
    userid: Option<String>,
}

fn parse_todo_meta(html: &str) -> Option<TodoMeta> {
    let body = html
        .trim()
        .strip_prefix("<!--")?
        .strip_suffix("-->")?
        .trim();
    let mut meta = TodoMeta::default();
    for pair in body.split(',') {
        let (key, value) = match pair.split_once('=') {
            Some(kv) => kv,
            None => continue,
        };
        match key.trim() {
            "todoid" => meta.todoid = Some(value.trim().to_string()),
            "userid" => meta.userid = Some(value.trim().to_string()),
            _ => {}
        }
    }
    if meta.todoid.is_none() && meta.userid.is_none() {
        return None;
    }
    Some(meta)
}

/// Strip the checkbox marker from an inline token; returns the checked state when one was found.
fn take_marker(inline: &mut Token) -> Option<(bool, TodoMeta)> {
    let first = inline.children.first()?;
    if first.kind != TokenKind::Text {
        return None;
    }
    let checked = todo_marker(&first.content)?;

    let rest: String = first.content.chars().skip(4).collect();
    if rest.is_empty() {
        inline.children.remove(0);
    } else {
        inline.children[0].content = rest;
    }

    let mut meta = TodoMeta::default();
    let comment = inline.children.iter().position(|t| {
        t.kind == TokenKind::HtmlInline && parse_todo_meta(&t.content).is_some()
    });
    if let Some(index) = comment {
        let token = inline.children.remove(index);
        meta = parse_todo_meta(&token.content).unwrap_or_default();
    }

    inline.content = inline.content.chars().skip(4).collect();
    Some((checked, meta))
}

fn reclassify_items(mut tokens: Vec<Token>) -> Vec<Token> {
    let mut lists: Vec<TokenKind> = Vec::new();
    let mut items: Vec<bool> = Vec::new();

    for i in 0..tokens.len() {
        let kind = tokens[i].kind.clone();
        match (&kind, tokens[i].nesting) {
            (TokenKind::BulletList | TokenKind::OrderedList, Nesting::Open) => {
                lists.push(kind.clone());
            }
            (TokenKind::BulletList | TokenKind::OrderedList, Nesting::Close) => {
                lists.pop();
            }
            (TokenKind::ListItem, Nesting::Open) => {
                let in_bullet_list = lists.last() == Some(&TokenKind::BulletList);
                let starts_with_paragraph = tokens
                    .get(i + 1)
                    .is_some_and(|t| t.is_open(&TokenKind::Paragraph));
                let marker = if in_bullet_list && starts_with_paragraph {
                    tokens
                        .get_mut(i + 2)
                        .filter(|t| t.kind == TokenKind::Inline)
                        .and_then(take_marker)
                } else {
                    None
                };

                match marker {
                    Some((checked, meta)) => {
                        let item = &mut tokens[i];
                        item.kind = TokenKind::TodoItem;
                        item.set_attr("checked", checked.to_string());
                        if let Some(todoid) = meta.todoid {
                            item.set_attr("todoid", todoid);
                        }
                        if let Some(userid) = meta.userid {
                            item.set_attr("userid", userid);
                        }
                        items.push(true);
                    }
                    None => items.push(false),
                }
            }
            (TokenKind::ListItem, Nesting::Close) => {
                if items.pop() == Some(true) {
                    tokens[i].kind = TokenKind::TodoItem;
                }
            }
            _ => {}
        }
    }
    tokens
}

/// An open list while splitting: bullet lists remember the kind of their current run.
enum OpenList {
    Bullet { template: Token, run: Option<TokenKind> },
    Other,
}

fn split_by_run(tokens: Vec<Token>) -> Vec<Token> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut lists: Vec<OpenList> = Vec::new();

    for token in tokens {
        match (token.kind.clone(), token.nesting) {
            (TokenKind::BulletList, Nesting::Open) => {
                lists.push(OpenList::Bullet {
                    template: token,
                    run: None,
                });
            }
            (TokenKind::BulletList, Nesting::Close) => match lists.pop() {
                Some(OpenList::Bullet { template, run }) => {
                    // an item-less list never opened a run
                    if run.is_none() {
                        out.push(template);
                    }
                    let mut close = token;
                    close.kind = run.unwrap_or(TokenKind::BulletList);
                    out.push(close);
                }
                _ => out.push(token),
            },
            (TokenKind::OrderedList, Nesting::Open) => {
                lists.push(OpenList::Other);
                out.push(token);
            }
            (TokenKind::OrderedList, Nesting::Close) => {
                lists.pop();
                out.push(token);
            }
            (TokenKind::ListItem | TokenKind::TodoItem, Nesting::Open) => {
                if let Some(OpenList::Bullet { template, run }) = lists.last_mut() {
                    let wanted = if token.kind == TokenKind::TodoItem {
                        TokenKind::TodoList
                    } else {
                        TokenKind::BulletList
                    };
                    match run {
                        Some(current) if *current == wanted => {}
                        Some(current) => {
                            out.push(
                                Token::close(current.clone())
                                    .with_markup(template.markup.clone()),
                            );
                            out.push(renamed(template, wanted.clone()));
                        }
                        None => out.push(renamed(template, wanted.clone())),
                    }
                    *run = Some(wanted);
                }
                out.push(token);
            }
            _ => out.push(token),
        }
    }
    out
}

fn renamed(template: &Token, kind: TokenKind) -> Token {
    let mut token = template.clone();
    token.kind = kind;
    token
}
