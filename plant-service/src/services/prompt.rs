/// Instruction sent with every image.
pub const DIAGNOSIS_PROMPT: &str = "\
As a plant pathologist, analyze the provided image and provide:
1. Disease identification (scientific names if possible)
2. Visible symptoms
3. Likely causes (pathogens/environmental)
4. Treatment options (organic & chemical)
5. Prevention measures
6. Additional health observations

If the image is unclear or not a plant, request a better image.
Keep the response concise but informative.
";
