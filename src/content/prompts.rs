//! Prompt rendering.
//!
//! One renderer per content kind. Each prompt embeds the request's
//! context fields and explicit formatting instructions describing the
//! exact JSON shape expected back; kinds that invent names also get a
//! "do not repeat" exclusion list to bias toward diversity.

use super::request::{ContentKind, ContentRequest};

/// Render the natural-language prompt for a request.
pub fn render(request: &ContentRequest) -> String {
    match request.kind {
        ContentKind::Post => render_post(request),
        ContentKind::Comment => render_comment(request),
        ContentKind::Profile => render_profile(request),
        ContentKind::Experience => render_experience(request),
        ContentKind::Skill => render_skill(request),
        ContentKind::Education => render_education(request),
    }
}

fn exclusion_block(request: &ContentRequest) -> String {
    if !request.kind.uses_exclusions() || request.exclusions.is_empty() {
        return String::new();
    }
    let list = request
        .exclusions
        .iter()
        .map(|name| format!("- {name}"))
        .collect::<Vec<_>>()
        .join("\n");
    format!("\nAlready used (do NOT repeat any of these, and stay far away from near-duplicates):\n{list}\n")
}

fn render_post(request: &ContentRequest) -> String {
    let name = request.context_field("name");
    let title = request.context_field("title");
    let bio = request.context_field("bio");
    let recent = request.context_field("recent_posts");

    let continuity = if recent.is_empty() {
        String::new()
    } else {
        format!(
            "Here are your recent posts for context:\n{recent}\n\
             Write a new post that is different from these but keeps a similar style and interests.\n"
        )
    };

    format!(
        "You are {name}, {title}.\nYour bio: {bio}\n\n{continuity}\
         Write a short, engaging social media post about a topic related to your professional background.\n\
         It can be something you learned today, something that happened at work, or a project you are passionate about.\n\
         Avoid hashtags and @ mentions. Keep it concise and professional yet casual; humour and emojis are fine when they fit.\n\n\
         Return ONLY a valid JSON object with this exact format:\n\
         {{\"content\": \"your post text here\"}}"
    )
}

fn render_comment(request: &ContentRequest) -> String {
    let name = request.context_field("name");
    let title = request.context_field("title");
    let bio = request.context_field("bio");
    let post_content = request.context_field("post_content");
    let author_name = request.context_field("post_author_name");
    let author_title = request.context_field("post_author_title");
    let author_bio = request.context_field("post_author_bio");
    let thread = request.context_field("thread");

    let thread_block = if thread.is_empty() {
        String::new()
    } else {
        format!("Existing comments:\n{thread}\n")
    };

    format!(
        "You are {name}, {title}.\n\
         Original post by {author_name} ({author_title}): {post_content}\n\n\
         Post author's background:\nTitle: {author_title}\nBio: {author_bio}\n\n\
         Your profile: {name} - {title}\nYour bio: {bio}\n\n\
         {thread_block}\
         Write a relevant, professional comment on this post. Focus on the topic; no hashtags or @ mentions.\n\n\
         GUIDELINES:\n\
         - Engage with the author's expertise naturally; do not reintroduce yourself or your credentials\n\
         - You may agree, disagree, ask a question, or share a related experience\n\
         - Humour and emojis are fine where they fit\n\
         - Keep it concise; do not reiterate the post or previous comments\n\n\
         Return ONLY a valid JSON object with this exact format:\n\
         {{\"content\": \"your comment text here\"}}"
    )
}

fn render_profile(request: &ContentRequest) -> String {
    format!(
        "Generate a realistic social media profile in JSON format with a creative and diverse name.\n\n\
         NAME INSTRUCTIONS:\n\
         - Draw from a wide variety of cultures and regions: Asian, European, African, Latin American, Middle Eastern, Slavic\n\
         - Mix traditional and modern names; unisex names are welcome\n\
         - Avoid reusing common placeholder surnames over and over\n\
         {}\n\
         Follow this exact structure:\n\
         {{\n    \"name\": \"Alex Smith\",\n    \"title\": \"Software Engineer & AI Enthusiast\",\n    \"bio\": \"Building the future with code. Passionate about AI, robotics, and sustainable tech.\"\n}}\n\n\
         The bio should be one or two sentences. Return ONLY the JSON object.",
        exclusion_block(request)
    )
}

fn render_experience(request: &ContentRequest) -> String {
    let name = request.context_field("name");
    let title = request.context_field("title");
    let bio = request.context_field("bio");

    format!(
        "Generate exactly 1 realistic work experience entry for a professional named {name} \
         with the title \"{title}\" and bio: \"{bio}\".\n\n\
         Return a JSON array with 1 experience object carrying these keys:\n\
         title, company, location (City, Country), startDate (ISO YYYY-MM-DD), \
         endDate (ISO YYYY-MM-DD or null if current), current (boolean), \
         description (2-3 sentences), employmentType, industry.\n\n\
         DIVERSITY INSTRUCTIONS:\n\
         - Vary company names across industries and regions; include startups, non-profits, and public institutions\n\
         - The company must sound realistic\n\
         {}\n\
         The experience must align with the person's background and current title.\n\
         IMPORTANT: Return ONLY valid JSON, no explanatory text before or after the array.",
        exclusion_block(request)
    )
}

fn render_skill(request: &ContentRequest) -> String {
    let title = request.context_field("title");
    let bio = request.context_field("bio");
    let count = request.context.get("count").map(String::as_str).unwrap_or("4");

    format!(
        "Generate {count} realistic professional skills for a person with the title \"{title}\" \
         and bio: \"{bio}\".\n\n\
         Return a JSON array of {count} skill objects, each with:\n\
         - name: skill name\n\
         - category: one of \"Programming Languages\", \"Soft Skills\", \"Tools\", \"Frameworks\", \"Methodologies\", or similar\n\n\
         Mix technical and soft skills, aligned with the person's background.\n\
         IMPORTANT: Return ONLY valid JSON, no explanatory text before or after the array."
    )
}

fn render_education(request: &ContentRequest) -> String {
    let title = request.context_field("title");
    let bio = request.context_field("bio");

    format!(
        "Generate exactly 1 realistic education entry for a person with the title \"{title}\" \
         and bio: \"{bio}\".\n\n\
         Return a JSON array with 1 education object carrying these keys:\n\
         school, degree, fieldOfStudy, startDate (ISO YYYY-MM-DD), \
         endDate (ISO YYYY-MM-DD or null if current), current (boolean), \
         grade (optional), activities (optional), description (optional).\n\n\
         DIVERSITY INSTRUCTIONS:\n\
         - Vary universities across countries; both prestigious and lesser-known institutions are fine\n\
         {}\n\
         The education must be relevant to the person's current title.\n\
         IMPORTANT: Return ONLY valid JSON, no explanatory text before or after the array.",
        exclusion_block(request)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::request::ContentKind;

    #[test]
    fn test_post_prompt_embeds_context() {
        let request = ContentRequest::new(ContentKind::Post)
            .with_context("name", "Amara Okafor")
            .with_context("title", "Data Engineer")
            .with_context("recent_posts", "- Shipped a pipeline\n");

        let prompt = render(&request);
        assert!(prompt.contains("Amara Okafor"));
        assert!(prompt.contains("Data Engineer"));
        assert!(prompt.contains("Shipped a pipeline"));
        assert!(prompt.contains("{\"content\""));
    }

    #[test]
    fn test_exclusions_only_for_name_inventing_kinds() {
        let names = vec!["Chen Wei".to_string(), "Ivan Petrov".to_string()];

        let profile = ContentRequest::new(ContentKind::Profile).with_exclusions(names.clone());
        assert!(render(&profile).contains("Chen Wei"));

        let post = ContentRequest::new(ContentKind::Post).with_exclusions(names);
        assert!(!render(&post).contains("Chen Wei"));
    }
}
